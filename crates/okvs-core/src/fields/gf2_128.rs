//! This module implements the extension field GF(2^128)

use super::Field;
use rand::{
    distr::{Distribution, StandardUniform},
    Rng,
};
use std::ops::{Add, Mul, Sub};

/// An element of GF(2^128) reduced by the GCM polynomial.
///
/// The inner representation uses the GCM bit order, i.e. the coefficient of
/// x^0 sits in the most-significant bit.
#[derive(Copy, Clone, Debug, PartialOrd, Ord, PartialEq, Eq)]
pub struct Gf2_128(pub(crate) u128);

impl Gf2_128 {
    /// Creates a new element from a u128 in standard bit order.
    pub fn new(input: u128) -> Self {
        Gf2_128::from(input)
    }
}

impl From<u128> for Gf2_128 {
    fn from(value: u128) -> Self {
        Self(value.reverse_bits())
    }
}

impl From<Gf2_128> for u128 {
    fn from(value: Gf2_128) -> Self {
        value.0.reverse_bits()
    }
}

impl Distribution<Gf2_128> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Gf2_128 {
        Gf2_128(rng.random())
    }
}

impl Field for Gf2_128 {
    const BIT_SIZE: u32 = 128;
    const BYTE_SIZE: usize = 16;

    fn zero() -> Self {
        Self(0)
    }

    fn one() -> Self {
        Self(1 << 127)
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Galois field inversion of 128-bit block
    fn inverse(mut self) -> Self {
        let one = Self::one();
        let mut out = one;

        for _ in 0..127 {
            self = self * self;
            out = out * self;
        }
        out
    }

    fn from_be_bytes(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; 16] = bytes.try_into().ok()?;
        Some(Self(u128::from_be_bytes(bytes)))
    }

    fn to_be_bytes(&self) -> Vec<u8> {
        self.0.to_be_bytes().to_vec()
    }
}

impl Add for Gf2_128 {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self.0 ^= rhs.0;
        self
    }
}

impl Sub for Gf2_128 {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self::Output {
        self.0 ^= rhs.0;
        self
    }
}

impl Mul for Gf2_128 {
    type Output = Self;

    /// Galois field multiplication of two 128-bit blocks reduced by the GCM polynomial
    fn mul(mut self, rhs: Self) -> Self::Output {
        /// R is the GCM polynomial in little-endian. In hex: "E1000000000000000000000000000000"
        const R: u128 = 299076299051606071403356588563077529600;

        let mut x = self.0;
        let y = rhs.0;

        let mut result: u128 = 0;
        for i in (0..128).rev() {
            result ^= x * ((y >> i) & 1);
            x = (x >> 1) ^ ((x & 1) * R);
        }
        self.0 = result;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::Gf2_128;
    use crate::fields::{Field, UniformRand};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn test_gf2_128_basic() {
        let mut rng = ChaCha12Rng::from_seed([0; 32]);
        let a = Gf2_128::rand(&mut rng);

        let zero = Gf2_128::zero();
        let one = Gf2_128::one();

        assert_eq!(a + zero, a);
        assert_eq!(a * zero, zero);
        assert_eq!(a * one, a);
        assert_eq!(a * a.inverse(), one);
        assert_eq!(a - a, zero);
        assert_eq!(Gf2_128::new(1), Gf2_128::one());
    }

    #[test]
    fn test_gf2_128_ring_axioms() {
        let mut rng = ChaCha12Rng::from_seed([0; 32]);
        for _ in 0..32 {
            let a = Gf2_128::rand(&mut rng);
            let b = Gf2_128::rand(&mut rng);
            let c = Gf2_128::rand(&mut rng);

            assert_eq!(a * b, b * a);
            assert_eq!((a * b) * c, a * (b * c));
            assert_eq!(a * (b + c), a * b + a * c);
        }
    }

    #[test]
    fn test_gf2_128_squaring_is_linear() {
        // the Frobenius map x -> x^2 is additive in characteristic 2
        let mut rng = ChaCha12Rng::from_seed([2; 32]);
        for _ in 0..32 {
            let a = Gf2_128::rand(&mut rng);
            let b = Gf2_128::rand(&mut rng);

            assert_eq!((a + b) * (a + b), a * a + b * b);
        }
    }

    #[test]
    fn test_inverse() {
        let mut rng = ChaCha12Rng::from_seed([0; 32]);
        let a = Gf2_128::rand(&mut rng);

        assert_eq!(a * a.inverse(), Gf2_128::one());
        assert_eq!(Gf2_128::one().inverse(), Gf2_128::one());
    }

    #[test]
    fn test_gf2_128_byte_round_trip() {
        let mut rng = ChaCha12Rng::from_seed([1; 32]);
        for _ in 0..32 {
            let a = Gf2_128::rand(&mut rng);
            assert_eq!(Gf2_128::from_be_bytes(&a.to_be_bytes()), Some(a));
        }
        assert_eq!(Gf2_128::from_be_bytes(&[0u8; 15]), None);
        assert_eq!(Gf2_128::from_be_bytes(&[0u8; 16]), Some(Gf2_128::zero()));
    }
}
