//! The cuckoo table over the sparse positions and the peeling which splits
//! it into a two-core and a removal-ordered rest.

/// An edge peeled off during two-core finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovedEdge {
    /// Index of the peeled edge, equal to the index of its key.
    pub edge: usize,
    /// First sparse position of the key.
    pub source: usize,
    /// Second sparse position of the key.
    pub target: usize,
}

/// The partition produced by peeling a cuckoo table.
#[derive(Debug, Default)]
pub struct TwoCore {
    /// Edges of the surviving two-core, in ascending edge order.
    pub core_edges: Vec<usize>,
    /// Peeled edges in removal order; back-fill walks this in reverse.
    pub removed: Vec<RemovedEdge>,
}

/// A cuckoo table with two hash functions: an incidence structure over the
/// sparse positions with one edge per key.
#[derive(Debug)]
pub struct H2CuckooTable {
    num_vertices: usize,
    edges: Vec<(usize, usize)>,
    adjacency: Vec<Vec<usize>>,
}

impl H2CuckooTable {
    /// Creates an empty table over `num_vertices` sparse positions.
    pub fn new(num_vertices: usize) -> Self {
        Self {
            num_vertices,
            edges: Vec::new(),
            adjacency: vec![Vec::new(); num_vertices],
        }
    }

    /// Adds the edge {v0, v1} and returns its index.
    ///
    /// The vertices must be distinct and in range; the position deriver
    /// guarantees both.
    pub fn add_edge(&mut self, v0: usize, v1: usize) -> usize {
        assert!(v0 != v1, "sparse positions must be distinct");
        assert!(v0 < self.num_vertices && v1 < self.num_vertices);

        let edge = self.edges.len();
        self.edges.push((v0, v1));
        self.adjacency[v0].push(edge);
        self.adjacency[v1].push(edge);
        edge
    }

    /// Returns the number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns the number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Returns the vertices of `edge`.
    pub fn vertices(&self, edge: usize) -> (usize, usize) {
        self.edges[edge]
    }

    /// Peels edges with a free endpoint one at a time until only the
    /// two-core remains.
    ///
    /// Candidate vertices are processed LIFO, seeded in ascending vertex
    /// order, so the removal order is deterministic for a given table.
    pub fn find_two_core(&self) -> TwoCore {
        let mut degree = vec![0usize; self.num_vertices];
        for &(v0, v1) in &self.edges {
            degree[v0] += 1;
            degree[v1] += 1;
        }

        let mut alive = vec![true; self.edges.len()];
        let mut candidates: Vec<usize> =
            (0..self.num_vertices).filter(|&v| degree[v] == 1).collect();
        let mut removed = Vec::new();

        while let Some(v) = candidates.pop() {
            if degree[v] != 1 {
                continue;
            }
            let edge = self.adjacency[v]
                .iter()
                .copied()
                .find(|&e| alive[e])
                .expect("a degree-one vertex has a live edge");
            alive[edge] = false;

            let (v0, v1) = self.edges[edge];
            degree[v0] -= 1;
            degree[v1] -= 1;
            removed.push(RemovedEdge {
                edge,
                source: v0,
                target: v1,
            });

            for u in [v0, v1] {
                if degree[u] == 1 {
                    candidates.push(u);
                }
            }
        }

        let core_edges = (0..self.edges.len()).filter(|&e| alive[e]).collect();
        TwoCore {
            core_edges,
            removed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::H2CuckooTable;

    #[test]
    fn test_empty_table() {
        let table = H2CuckooTable::new(8);
        let two_core = table.find_two_core();

        assert!(two_core.core_edges.is_empty());
        assert!(two_core.removed.is_empty());
    }

    #[test]
    fn test_path_peels_completely() {
        // 0 - 1 - 2 - 3: no cycle, everything peels
        let mut table = H2CuckooTable::new(4);
        table.add_edge(0, 1);
        table.add_edge(1, 2);
        table.add_edge(2, 3);

        let two_core = table.find_two_core();

        assert!(two_core.core_edges.is_empty());
        assert_eq!(two_core.removed.len(), 3);
        // each record carries the edge's original vertex pair
        for rec in &two_core.removed {
            assert_eq!((rec.source, rec.target), table.vertices(rec.edge));
        }
    }

    #[test]
    fn test_cycle_is_core() {
        // a triangle has minimum degree two and survives peeling
        let mut table = H2CuckooTable::new(3);
        table.add_edge(0, 1);
        table.add_edge(1, 2);
        table.add_edge(2, 0);

        let two_core = table.find_two_core();

        assert_eq!(two_core.core_edges, vec![0, 1, 2]);
        assert!(two_core.removed.is_empty());
    }

    #[test]
    fn test_pendant_edge_peels_off_cycle() {
        // triangle 0-1-2 plus the pendant edge 2-3
        let mut table = H2CuckooTable::new(4);
        table.add_edge(0, 1);
        table.add_edge(1, 2);
        table.add_edge(2, 0);
        let pendant = table.add_edge(2, 3);

        let two_core = table.find_two_core();

        assert_eq!(two_core.core_edges, vec![0, 1, 2]);
        assert_eq!(two_core.removed.len(), 1);
        assert_eq!(two_core.removed[0].edge, pendant);
    }

    #[test]
    fn test_parallel_edges_are_core() {
        // two keys hashing to the same vertex pair keep both vertices at
        // degree two
        let mut table = H2CuckooTable::new(4);
        table.add_edge(0, 1);
        table.add_edge(0, 1);

        let two_core = table.find_two_core();

        assert_eq!(two_core.core_edges, vec![0, 1]);
        assert!(two_core.removed.is_empty());
    }

    #[test]
    fn test_peeling_is_deterministic() {
        let build = || {
            let mut table = H2CuckooTable::new(8);
            table.add_edge(0, 1);
            table.add_edge(1, 2);
            table.add_edge(3, 4);
            table.add_edge(5, 6);
            table.add_edge(6, 7);
            table.add_edge(7, 5);
            table
        };

        let a = build().find_two_core();
        let b = build().find_two_core();

        assert_eq!(a.core_edges, b.core_edges);
        assert_eq!(a.removed, b.removed);
    }
}
