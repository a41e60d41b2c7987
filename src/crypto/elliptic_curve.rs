//! secp256k1 domain parameters.
//!
//! The arithmetic itself is done by `k256`; the constants here are the values every other module
//! agrees on. Tests also build a `BigUint` view of them to check the backend against.

#[cfg(test)]
use std::sync::OnceLock;

#[cfg(test)]
use num_bigint::BigUint;
#[cfg(test)]
use num_traits::Zero;

/// Size of a serialized scalar (private key, nonce or signature) in bytes.
pub const SCALAR_SIZE: usize = 32;

/// Size of a SEC1 compressed point in bytes.
pub const POINT_SIZE: usize = 33;

/// Group order N, big-endian.
pub const ORDER: [u8; SCALAR_SIZE] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b,
    0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// Field prime P, big-endian.
pub const FIELD_PRIME: [u8; SCALAR_SIZE] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xfc, 0x2f,
];

/// X coordinate of the generator G, big-endian.
pub const GENERATOR_X: [u8; SCALAR_SIZE] = [
    0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac,
    0x55, 0xa0, 0x62, 0x95, 0xce, 0x87, 0x0b, 0x07,
    0x02, 0x9b, 0xfc, 0xdb, 0x2d, 0xce, 0x28, 0xd9,
    0x59, 0xf2, 0x81, 0x5b, 0x16, 0xf8, 0x17, 0x98,
];

/// Y coordinate of the generator G, big-endian.
pub const GENERATOR_Y: [u8; SCALAR_SIZE] = [
    0x48, 0x3a, 0xda, 0x77, 0x26, 0xa3, 0xc4, 0x65,
    0x5d, 0xa4, 0xfb, 0xfc, 0x0e, 0x11, 0x08, 0xa8,
    0xfd, 0x17, 0xb4, 0x48, 0xa6, 0x85, 0x54, 0x19,
    0x9c, 0x47, 0xd0, 0x8f, 0xfb, 0x10, 0xd4, 0xb8,
];

/// Curve `y^2 = x^3 + a*x + b` over the prime field of order `p`, with a generator `g` of order `n`.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CurveParams {
    pub p: BigUint,
    pub a: BigUint,
    pub b: BigUint,
    pub gx: BigUint,
    pub gy: BigUint,
    pub n: BigUint,
}

#[cfg(test)]
impl CurveParams {
    /// Whether `(x, y)` satisfies the curve equation.
    pub fn contains(&self, x: &BigUint, y: &BigUint) -> bool {
        if x >= &self.p || y >= &self.p {
            return false;
        }
        let lhs = (y * y) % &self.p;
        let rhs = (x * x * x + &self.a * x + &self.b) % &self.p;
        lhs == rhs
    }

    /// Whether `value` is usable as a private scalar, i.e. `0 < value < n`.
    pub fn is_valid_scalar(&self, value: &BigUint) -> bool {
        !value.is_zero() && value < &self.n
    }
}

/// The process-wide secp256k1 parameters. Built once, never mutated.
#[cfg(test)]
pub(crate) fn params() -> &'static CurveParams {
    static PARAMS: OnceLock<CurveParams> = OnceLock::new();
    PARAMS.get_or_init(|| CurveParams {
        p: BigUint::from_bytes_be(&FIELD_PRIME),
        a: BigUint::from(0u32),
        b: BigUint::from(7u32),
        gx: BigUint::from_bytes_be(&GENERATOR_X),
        gy: BigUint::from_bytes_be(&GENERATOR_Y),
        n: BigUint::from_bytes_be(&ORDER),
    })
}
