//! A data-oblivious key-value store (DOKVS) over GF(2^κ) built from a
//! garbled cuckoo table with two sparse hash functions.
//!
//! [`Gct2Dokvs::encode`] maps up to `n` key-value pairs into a storage
//! vector of `m` field elements such that [`Gct2Dokvs::decode`], given only
//! the public hash keys and the storage, reproduces the value of every
//! encoded key. The storage reveals neither which keys were encoded nor, in
//! doubly-encode mode, anything about positions no equation touched.
//!
//! The plain construction is from the following paper:
//!
//! Pinkas B, Rosulek M, Trieu N, et al. PSI from PaXoS: Fast, Malicious
//! Private Set Intersection. EUROCRYPT 2020.
//!
//! The doubly-oblivious variant is from the following paper:
//!
//! Rindal, Peter, and Phillipp Schoppmann. VOLE-PSI: fast OPRF and
//! circuit-PSI from vector-OLE. EUROCRYPT 2021.

pub mod cuckoo;
mod gct;
pub mod key;
pub mod solver;

pub use gct::{dense_size, sparse_size, Gct2Dokvs, HASH_KEY_NUM};
pub use key::OkvsKey;

/// Errors which can occur when encoding or decoding an OKVS.
#[derive(Debug, thiserror::Error)]
pub enum OkvsError {
    /// More key-value pairs than the instance capacity.
    #[error("{pairs} key-value pairs exceed the capacity of {capacity}")]
    CapacityExceeded {
        /// Number of pairs passed to encode.
        pairs: usize,
        /// Capacity n of the instance.
        capacity: usize,
    },
    /// The same key appears more than once in the input pairs.
    #[error("duplicate key in the input pairs")]
    DuplicateKey,
    /// Storage passed to decode has a length other than m.
    #[error("storage length {actual} does not match m = {expected}")]
    StorageLength {
        /// Length of the storage passed in.
        actual: usize,
        /// Expected length m.
        expected: usize,
    },
    /// The linear system induced by the two-core has no solution.
    ///
    /// This is an expected, low-probability event of the probabilistic
    /// construction: retry the encoding with fresh hash keys.
    #[error("no solution: {equations} core equations over {unknowns} unknowns")]
    Infeasible {
        /// Number of equations in the two-core.
        equations: usize,
        /// Number of unknowns available to satisfy them.
        unknowns: usize,
    },
}
