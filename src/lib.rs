//! Signing core of a Discreet Log Contract oracle on secp256k1.
//!
//! The oracle holds a long-term key `a` and, for every outcome it will attest to, announces a
//! one-time R-point `R = k*G` in advance. Once the outcome `m` is known it publishes
//! `s = k - H(m || Rx)*a`. Because `s` is linear in the secrets, anyone can compute `s*G` from
//! `A = a*G`, `R` and `m` alone ([`compute_anticipated_point`]) and build contracts against it
//! before the oracle signs.
//!
//! # One-time keys
//!
//! A one-time scalar must never sign two different messages: the two signatures reveal the
//! long-term private key. [`OneTimeScalar`] is move-only and consumed by [`compute_signature`].
//!
//! ```
//! use dlc_oracle_core::{
//!     compute_anticipated_point, compute_signature, encode_numeric_message, OneTimeKeypair, PrivateKey,
//! };
//!
//! let key = PrivateKey::generate().unwrap();
//! let oracle = key.public_key().unwrap();
//!
//! let (nonce, nonce_point) = OneTimeKeypair::generate().unwrap().into_parts();
//! let message = encode_numeric_message(42);
//!
//! let anticipated = compute_anticipated_point(oracle.as_bytes(), nonce_point.as_bytes(), &message).unwrap();
//! let signature = compute_signature(&key, nonce, &message).unwrap();
//! assert_eq!(signature.public_point().unwrap(), anticipated);
//! ```

pub mod config;
pub mod crypto;
pub mod service;
pub mod store;

#[cfg(test)]
mod testing;

pub use crypto::{
    compute_anticipated_point, compute_signature, decode_numeric_message, derive_public_key,
    encode_numeric_message, generate_one_time_scalar, OneTimeKeypair, OneTimeScalar, OracleError, PrivateKey,
    PublicPoint, Signature,
};
