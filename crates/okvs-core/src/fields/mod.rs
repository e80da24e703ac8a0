//! Finite field abstractions used by the OKVS encoders.

pub mod gf2_128;

use std::{
    fmt::Debug,
    ops::{Add, Mul, Sub},
};

use rand::{
    distr::{Distribution, StandardUniform},
    Rng,
};

/// A finite field element of fixed bit width with byte-exact serialization.
pub trait Field:
    Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Copy
    + Clone
    + Debug
    + PartialEq
    + Eq
    + Send
    + Sync
    + UniformRand
    + 'static
{
    /// Bit width κ of the field.
    const BIT_SIZE: u32;
    /// Serialized length in bytes, κ / 8.
    const BYTE_SIZE: usize;

    /// Returns the additive neutral element.
    fn zero() -> Self;

    /// Returns the multiplicative neutral element.
    fn one() -> Self;

    /// Returns whether this element is zero.
    fn is_zero(&self) -> bool;

    /// Returns the multiplicative inverse.
    ///
    /// The element must be non-zero.
    fn inverse(self) -> Self;

    /// Deserializes an element from exactly [`Self::BYTE_SIZE`] big-endian
    /// bytes, or `None` on a length mismatch.
    fn from_be_bytes(bytes: &[u8]) -> Option<Self>;

    /// Serializes the element into [`Self::BYTE_SIZE`] big-endian bytes.
    fn to_be_bytes(&self) -> Vec<u8>;
}

/// A trait for sampling random elements of the field
///
/// This is helpful, because we do not need to import other traits since this is
/// a supertrait of field (which is not possible with `StandardUniform` and
/// `Distribution`)
pub trait UniformRand: Sized {
    /// Returns a random field element.
    fn rand<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

impl<T> UniformRand for T
where
    StandardUniform: Distribution<T>,
{
    #[inline]
    fn rand<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.sample(StandardUniform)
    }
}

#[cfg(test)]
mod tests {
    use super::Field;
    use crate::fields::gf2_128::Gf2_128;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn test_field_basic<T: Field>() {
        let mut rng = ChaCha12Rng::from_seed([0; 32]);
        let a = T::rand(&mut rng);

        let zero = T::zero();
        let one = T::one();

        assert_eq!(a + zero, a);
        assert_eq!(a * zero, zero);
        assert_eq!(a * one, a);
        assert_eq!(a * a.inverse(), one);
        assert_eq!(one.inverse(), one);
        assert_eq!(a - a, zero);
    }

    fn test_field_serialization<T: Field>() {
        let mut rng = ChaCha12Rng::from_seed([1; 32]);
        let a = T::rand(&mut rng);

        let bytes = a.to_be_bytes();
        assert_eq!(bytes.len(), T::BYTE_SIZE);
        assert_eq!(T::from_be_bytes(&bytes), Some(a));
        assert_eq!(T::from_be_bytes(&bytes[1..]), None);
    }

    #[test]
    fn test_gf2_128_field_basic() {
        test_field_basic::<Gf2_128>();
    }

    #[test]
    fn test_gf2_128_field_serialization() {
        test_field_serialization::<Gf2_128>();
    }
}
