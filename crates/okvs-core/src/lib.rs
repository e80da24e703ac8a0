//! Primitives shared by the OKVS constructions: finite field elements over
//! GF(2^κ) and the keyed PRF both parties use to derive public hash
//! positions from keys.

pub mod fields;
pub mod prf;
