//! The keyed pseudorandom function used to derive positions from keys.

use blake3::Hasher;

/// Byte length of a PRF key.
pub const PRF_KEY_SIZE: usize = 32;

/// A deterministic keyed map from byte strings to byte strings of any
/// requested length.
///
/// Both parties of a protocol construct the PRF from the same public hash
/// key and therefore derive identical outputs for identical inputs.
#[derive(Clone)]
pub struct Prf {
    hasher: Hasher,
}

impl Prf {
    /// Creates a new PRF from a key.
    pub fn new(key: &[u8; PRF_KEY_SIZE]) -> Self {
        Self {
            hasher: Hasher::new_keyed(key),
        }
    }

    /// Fills `output` with PRF(input).
    pub fn eval_into(&self, input: &[u8], output: &mut [u8]) {
        let mut hasher = self.hasher.clone();
        hasher.update(input);
        hasher.finalize_xof().fill(output);
    }

    /// Returns `len` bytes of PRF(input).
    pub fn eval(&self, input: &[u8], len: usize) -> Vec<u8> {
        let mut output = vec![0u8; len];
        self.eval_into(input, &mut output);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::{Prf, PRF_KEY_SIZE};

    #[test]
    fn test_prf_deterministic() {
        let prf = Prf::new(&[42u8; PRF_KEY_SIZE]);

        assert_eq!(prf.eval(b"key", 16), prf.eval(b"key", 16));
    }

    #[test]
    fn test_prf_key_separation() {
        let a = Prf::new(&[0u8; PRF_KEY_SIZE]);
        let b = Prf::new(&[1u8; PRF_KEY_SIZE]);

        assert_ne!(a.eval(b"key", 16), b.eval(b"key", 16));
    }

    #[test]
    fn test_prf_input_separation() {
        let prf = Prf::new(&[0u8; PRF_KEY_SIZE]);

        assert_ne!(prf.eval(b"a", 16), prf.eval(b"b", 16));
    }

    #[test]
    fn test_prf_output_length() {
        let prf = Prf::new(&[0u8; PRF_KEY_SIZE]);

        for len in [1, 8, 16, 64] {
            assert_eq!(prf.eval(b"key", len).len(), len);
        }
        // the output is an XOF, shorter outputs are prefixes of longer ones
        assert_eq!(prf.eval(b"key", 64)[..16], prf.eval(b"key", 16));
    }
}
