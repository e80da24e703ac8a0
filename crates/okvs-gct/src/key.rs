//! Key types which can be encoded into an OKVS.

use std::hash::Hash;

/// A key which can be encoded into an OKVS.
///
/// Positions are derived by hashing the byte representation of a key, so the
/// representation must be stable: two parties serializing the same key must
/// obtain identical bytes.
pub trait OkvsKey: Clone + Eq + Hash + Send + Sync {
    /// Returns the stable byte representation of the key.
    fn to_bytes(&self) -> Vec<u8>;
}

impl OkvsKey for Vec<u8> {
    fn to_bytes(&self) -> Vec<u8> {
        self.clone()
    }
}

impl<const N: usize> OkvsKey for [u8; N] {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_vec()
    }
}

impl OkvsKey for u64 {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }
}

impl OkvsKey for u128 {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }
}

impl OkvsKey for String {
    fn to_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}
