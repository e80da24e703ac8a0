//! The garbled-cuckoo-table encoder and decoder.

use std::collections::{BTreeSet, HashSet};
use std::marker::PhantomData;

use okvs_core::{
    fields::Field,
    prf::{Prf, PRF_KEY_SIZE},
};
use rand::{CryptoRng, Rng};
use tracing::{debug, instrument};

use crate::{
    cuckoo::H2CuckooTable,
    key::OkvsKey,
    solver::{self, SystemInfo},
    OkvsError,
};

/// Number of hash keys a [`Gct2Dokvs`] instance consumes.
pub const HASH_KEY_NUM: usize = 2;

/// Statistical security parameter λ in bits.
const STATS_BITS: f64 = 40.0;
/// Expansion of the sparse part, lm ≈ ε_l · n.
const SPARSE_EPSILON: f64 = 2.0;
/// Empirical fit of the two-core gap, α(n) = A / (log2 n − C) + B. The dense
/// part must absorb λ/α(n) equations beyond the core vertex count; the
/// constants are calibrated against the singleton peeler's core-size
/// distribution.
const GAP_A: f64 = 7.529;
const GAP_B: f64 = 0.61;
const GAP_C: f64 = 2.556;

fn byte_align(bits: usize) -> usize {
    bits.div_ceil(8) * 8
}

/// Returns the length of the sparse (left) storage part for capacity `n`.
pub fn sparse_size(n: usize) -> usize {
    assert!(n >= 1, "n must be positive");
    byte_align((SPARSE_EPSILON * n as f64).ceil() as usize)
}

/// Returns the length of the dense (right) storage part for capacity `n`.
pub fn dense_size(n: usize) -> usize {
    assert!(n >= 1, "n must be positive");
    let alpha = GAP_A / ((n as f64).log2() - GAP_C) + GAP_B;
    let gap = if alpha.is_finite() && alpha > 0.0 {
        (STATS_BITS / alpha + 1.9).ceil() as usize
    } else {
        // below the fit's validity range the core is tiny anyway
        1
    };
    byte_align(gap.max(1))
}

/// Per-key derived data: the two sparse positions and the dense row.
struct DerivedKey<F> {
    p0: usize,
    p1: usize,
    dense: Vec<F>,
}

/// A DOKVS built from a garbled cuckoo table with two sparse hash
/// functions.
///
/// All parameters are fixed at construction and the instance is read-only
/// afterwards; both parties of a protocol must construct it from the same
/// `n` and hash keys to derive identical positions.
pub struct Gct2Dokvs<K, F> {
    n: usize,
    lm: usize,
    rm: usize,
    m: usize,
    sparse_prf: Prf,
    dense_prf: Prf,
    _pd: PhantomData<fn(K) -> F>,
}

impl<K: OkvsKey, F: Field> Gct2Dokvs<K, F> {
    /// Creates an instance for at most `n` key-value pairs.
    pub fn new(n: usize, hash_keys: &[[u8; PRF_KEY_SIZE]; HASH_KEY_NUM]) -> Self {
        assert!(n >= 1, "n must be positive");
        let lm = sparse_size(n);
        let rm = dense_size(n);
        Self {
            n,
            lm,
            rm,
            m: lm + rm,
            sparse_prf: Prf::new(&hash_keys[0]),
            dense_prf: Prf::new(&hash_keys[1]),
            _pd: PhantomData,
        }
    }

    /// Returns the capacity n.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns the total storage length m = lm + rm.
    pub fn m(&self) -> usize {
        self.m
    }

    /// Returns the length lm of the sparse (left) storage part.
    pub fn sparse_size(&self) -> usize {
        self.lm
    }

    /// Returns the length rm of the dense (right) storage part.
    pub fn dense_size(&self) -> usize {
        self.rm
    }

    /// Returns the two distinct sparse positions of `key`, both in
    /// `[0, lm)`.
    pub fn sparse_positions(&self, key: &K) -> (usize, usize) {
        self.sparse_positions_of(&key.to_bytes())
    }

    /// Returns the dense coordinate row of `key`: e, e², e⁴, … for the
    /// PRF-derived element e, rm entries in total.
    pub fn dense_row(&self, key: &K) -> Vec<F> {
        self.dense_row_of(&key.to_bytes())
    }

    fn sparse_positions_of(&self, key_bytes: &[u8]) -> (usize, usize) {
        let mut raw = [0u8; 8];
        self.sparse_prf.eval_into(key_bytes, &mut raw);
        let r0 = u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize;
        let r1 = u32::from_be_bytes([raw[4], raw[5], raw[6], raw[7]]) as usize;
        // distinct positions via the method provided in VOLE-PSI: draw the
        // second position from [0, lm - 1) and skip over the first
        let p0 = r0 % self.lm;
        let mut p1 = r1 % (self.lm - 1);
        if p1 >= p0 {
            p1 += 1;
        }
        (p0, p1)
    }

    fn dense_row_of(&self, key_bytes: &[u8]) -> Vec<F> {
        let mut bytes = vec![0u8; F::BYTE_SIZE];
        self.dense_prf.eval_into(key_bytes, &mut bytes);
        let mut row = Vec::with_capacity(self.rm);
        row.push(F::from_be_bytes(&bytes).expect("PRF output has field length"));
        for i in 1..self.rm {
            let previous = row[i - 1];
            row.push(previous * previous);
        }
        row
    }

    fn derive(&self, key: &K) -> DerivedKey<F> {
        let bytes = key.to_bytes();
        let (p0, p1) = self.sparse_positions_of(&bytes);
        DerivedKey {
            p0,
            p1,
            dense: self.dense_row_of(&bytes),
        }
    }

    /// Encodes `pairs` into a storage vector of `m` field elements.
    ///
    /// With `doubly_encode` set, every storage position no equation
    /// constrains is filled with a fresh random element, making the result
    /// indistinguishable from uniform outside the encoded rows; otherwise
    /// unconstrained positions are zero.
    ///
    /// Keys must be distinct and there must be at most `n` pairs. An
    /// [`OkvsError::Infeasible`] result is an expected, low-probability
    /// event: retry the encoding with fresh hash keys.
    #[instrument(level = "debug", skip_all, fields(n = self.n, pairs = pairs.len(), doubly_encode), err)]
    pub fn encode<R: Rng + CryptoRng>(
        &self,
        pairs: &[(K, F)],
        doubly_encode: bool,
        rng: &mut R,
    ) -> Result<Vec<F>, OkvsError> {
        if pairs.len() > self.n {
            return Err(OkvsError::CapacityExceeded {
                pairs: pairs.len(),
                capacity: self.n,
            });
        }
        let mut seen = HashSet::with_capacity(pairs.len());
        for (key, _) in pairs {
            if !seen.insert(key) {
                return Err(OkvsError::DuplicateKey);
            }
        }

        // derive sparse positions and dense rows, key by key
        #[cfg(feature = "parallel")]
        let derived: Vec<DerivedKey<F>> = {
            use rayon::prelude::*;
            pairs.par_iter().map(|(key, _)| self.derive(key)).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let derived: Vec<DerivedKey<F>> =
            pairs.iter().map(|(key, _)| self.derive(key)).collect();

        // build the cuckoo table and peel it down to its two-core
        let mut table = H2CuckooTable::new(self.lm);
        for key in &derived {
            table.add_edge(key.p0, key.p1);
        }
        let two_core = table.find_two_core();

        // the unknowns touched by the core, in deterministic order
        let core_vertices: BTreeSet<usize> = two_core
            .core_edges
            .iter()
            .flat_map(|&e| [derived[e].p0, derived[e].p1])
            .collect();
        let equations = two_core.core_edges.len();
        let unknowns = core_vertices.len() + self.rm;
        debug!(
            equations,
            core_vertices = core_vertices.len(),
            removed = two_core.removed.len(),
            "two-core found"
        );

        // more independent equations than unknowns: no solution
        if equations > unknowns {
            return Err(OkvsError::Infeasible {
                equations,
                unknowns,
            });
        }

        // solve the core system
        let (mut left, right) = if doubly_encode {
            self.solve_doubly(pairs, &derived, &two_core.core_edges, &core_vertices, rng)?
        } else {
            self.solve_free(pairs, &derived, &two_core.core_edges, &core_vertices)?
        };

        // back-fill the peeled edges in reverse removal order; each has at
        // least one unassigned endpoint left
        for record in two_core.removed.iter().rev() {
            let row = &derived[record.edge];
            let mut inner = F::zero();
            for (coeff, entry) in row.dense.iter().zip(&right) {
                inner = inner + *coeff * *entry;
            }
            let remaining = pairs[record.edge].1 - inner;

            match (left[record.source], left[record.target]) {
                (None, None) => {
                    let share = F::rand(rng);
                    left[record.source] = Some(share);
                    left[record.target] = Some(remaining - share);
                }
                (None, Some(target)) => left[record.source] = Some(remaining - target),
                (Some(source), None) => left[record.target] = Some(remaining - source),
                (Some(_), Some(_)) => panic!(
                    "two-core peeling violated: both endpoints ({}, {}) of edge {} assigned",
                    record.source, record.target, record.edge
                ),
            }
        }

        // complete the unconstrained left positions
        let mut storage = Vec::with_capacity(self.m);
        for slot in left {
            storage.push(match slot {
                Some(value) => value,
                None if doubly_encode => F::rand(rng),
                None => F::zero(),
            });
        }
        storage.extend(right);
        Ok(storage)
    }

    /// Solves the core system restricted to the touched left columns plus
    /// the dense columns, randomizing every free variable.
    fn solve_doubly<R: Rng + CryptoRng>(
        &self,
        pairs: &[(K, F)],
        derived: &[DerivedKey<F>],
        core_edges: &[usize],
        core_vertices: &BTreeSet<usize>,
        rng: &mut R,
    ) -> Result<(Vec<Option<F>>, Vec<F>), OkvsError> {
        let mut left = vec![None; self.lm];
        if core_edges.is_empty() {
            let right = (0..self.rm).map(|_| F::rand(rng)).collect();
            return Ok((left, right));
        }

        let d = core_vertices.len();
        let columns: Vec<usize> = core_vertices.iter().copied().collect();
        let mut column_of = vec![0usize; self.lm];
        for (index, &vertex) in columns.iter().enumerate() {
            column_of[vertex] = index;
        }

        let mut lhs: Vec<Vec<F>> = Vec::with_capacity(core_edges.len());
        let mut rhs: Vec<F> = Vec::with_capacity(core_edges.len());
        for &edge in core_edges {
            let key = &derived[edge];
            let mut row = vec![F::zero(); d + self.rm];
            row[column_of[key.p0]] = F::one();
            row[column_of[key.p1]] = F::one();
            row[d..].copy_from_slice(&key.dense);
            lhs.push(row);
            rhs.push(pairs[edge].1);
        }

        let mut x = vec![F::zero(); d + self.rm];
        if solver::full_solve(&mut lhs, &mut rhs, &mut x, rng) != SystemInfo::Consistent {
            return Err(OkvsError::Infeasible {
                equations: core_edges.len(),
                unknowns: d + self.rm,
            });
        }

        for (index, &vertex) in columns.iter().enumerate() {
            left[vertex] = Some(x[index]);
        }
        Ok((left, x[d..].to_vec()))
    }

    /// Solves the core system over the full m-column space with free
    /// variables fixed to zero.
    fn solve_free(
        &self,
        pairs: &[(K, F)],
        derived: &[DerivedKey<F>],
        core_edges: &[usize],
        core_vertices: &BTreeSet<usize>,
    ) -> Result<(Vec<Option<F>>, Vec<F>), OkvsError> {
        let mut left = vec![None; self.lm];
        if core_edges.is_empty() {
            return Ok((left, vec![F::zero(); self.rm]));
        }

        let mut lhs: Vec<Vec<F>> = Vec::with_capacity(core_edges.len());
        let mut rhs: Vec<F> = Vec::with_capacity(core_edges.len());
        for &edge in core_edges {
            let key = &derived[edge];
            let mut row = vec![F::zero(); self.m];
            row[key.p0] = F::one();
            row[key.p1] = F::one();
            row[self.lm..].copy_from_slice(&key.dense);
            lhs.push(row);
            rhs.push(pairs[edge].1);
        }

        let mut x = vec![F::zero(); self.m];
        if solver::free_solve(&mut lhs, &mut rhs, &mut x) != SystemInfo::Consistent {
            return Err(OkvsError::Infeasible {
                equations: core_edges.len(),
                unknowns: core_vertices.len() + self.rm,
            });
        }

        for &vertex in core_vertices {
            left[vertex] = Some(x[vertex]);
        }
        Ok((left, x[self.lm..].to_vec()))
    }

    /// Decodes the value of `key` from `storage`.
    ///
    /// Never fails for storage of length `m`; any key decodes to some
    /// well-formed element, whether it was encoded or not.
    pub fn decode(&self, storage: &[F], key: &K) -> Result<F, OkvsError> {
        if storage.len() != self.m {
            return Err(OkvsError::StorageLength {
                actual: storage.len(),
                expected: self.m,
            });
        }
        let bytes = key.to_bytes();
        let (p0, p1) = self.sparse_positions_of(&bytes);
        let dense = self.dense_row_of(&bytes);

        // p0 and p1 are distinct by construction
        let mut value = storage[p0] + storage[p1];
        for (coeff, entry) in dense.iter().zip(&storage[self.lm..]) {
            value = value + *coeff * *entry;
        }
        Ok(value)
    }
}
