//! Long-term and one-time keys, and scalar to point derivation.

use std::fmt;

use elliptic_curve::sec1::ToEncodedPoint;
use elliptic_curve::{Group, PrimeField};
use k256::{FieldBytes, ProjectivePoint, PublicKey, Scalar};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::elliptic_curve::{POINT_SIZE, SCALAR_SIZE};
use crate::crypto::error::OracleError;

/// Parses a big-endian scalar, rejecting zero and anything not below the group order.
pub(crate) fn parse_scalar(bytes: &[u8; SCALAR_SIZE]) -> Result<Zeroizing<Scalar>, OracleError> {
    let scalar: Option<Scalar> = Scalar::from_repr(FieldBytes::from(*bytes)).into();
    let scalar = Zeroizing::new(scalar.ok_or(OracleError::InvalidScalar)?);
    if bool::from(scalar.is_zero()) {
        return Err(OracleError::InvalidScalar);
    }
    Ok(scalar)
}

/// Parses a SEC1 compressed point. Uncompressed and identity encodings are rejected.
pub(crate) fn parse_point(bytes: &[u8; POINT_SIZE]) -> Result<ProjectivePoint, OracleError> {
    PublicKey::from_sec1_bytes(bytes)
        .map(|key| key.to_projective())
        .map_err(|_| OracleError::InvalidPublicKey)
}

/// Computes `scalar * G` in compressed form.
///
/// Deterministic; fails with [`OracleError::InvalidScalar`] if the scalar is zero or not below
/// the group order.
pub fn derive_public_key(scalar: &[u8; SCALAR_SIZE]) -> Result<PublicPoint, OracleError> {
    let scalar = parse_scalar(scalar)?;
    let point = ProjectivePoint::GENERATOR * *scalar;
    PublicPoint::from_projective(&point).ok_or(OracleError::InvalidScalar)
}

/// Draws a fresh one-time scalar from the operating system CSPRNG.
///
/// The draw is not checked against the group order. Zero or an out of range value happens with
/// probability around 2^-128 and surfaces as [`OracleError::InvalidScalar`] once the scalar is used.
pub fn generate_one_time_scalar() -> Result<OneTimeScalar, OracleError> {
    let mut bytes = Zeroizing::new([0u8; SCALAR_SIZE]);
    getrandom::getrandom(&mut bytes[..]).map_err(|_| OracleError::Entropy)?;
    Ok(OneTimeScalar(*bytes))
}

/// A compressed secp256k1 point: the oracle's public key, a nonce R-point, or an anticipated
/// signature point. Always holds a valid, non-identity point.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicPoint([u8; POINT_SIZE]);

impl PublicPoint {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, OracleError> {
        let bytes: [u8; POINT_SIZE] = bytes
            .try_into()
            .map_err(|_| OracleError::InvalidPublicKey)?;
        parse_point(&bytes)?;
        Ok(Self(bytes))
    }

    pub fn from_hex(hex: &str) -> Result<Self, OracleError> {
        let bytes = hex::decode(hex.trim()).map_err(|_| OracleError::InvalidPublicKey)?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; POINT_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The big-endian X coordinate.
    pub fn x(&self) -> &[u8] {
        &self.0[1..]
    }

    pub(crate) fn from_projective(point: &ProjectivePoint) -> Option<Self> {
        if bool::from(point.is_identity()) {
            return None;
        }
        let encoded = point.to_affine().to_encoded_point(true);
        let bytes: [u8; POINT_SIZE] = encoded.as_bytes().try_into().ok()?;
        Some(Self(bytes))
    }
}

impl fmt::Debug for PublicPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicPoint({})", self.to_hex())
    }
}

impl fmt::Display for PublicPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for PublicPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = <String>::deserialize(deserializer)?;
        PublicPoint::from_hex(&hex)
            .map_err(|_| serde::de::Error::custom("invalid sec1 compressed point"))
    }
}

/// The oracle's long-term private scalar.
///
/// Lives for the whole operational lifetime of the oracle; losing it leaves every outstanding
/// contract that references its public key unsettleable. Not `Clone`, and wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; SCALAR_SIZE]);

impl PrivateKey {
    /// Wraps raw key bytes. The range is checked when the key is used, not here.
    pub fn from_bytes(bytes: [u8; SCALAR_SIZE]) -> Self {
        Self(bytes)
    }

    /// Generates a valid long-term key from the operating system CSPRNG, drawing again in the
    /// (negligible) case the first draw is out of range.
    pub fn generate() -> Result<Self, OracleError> {
        loop {
            let mut bytes = Zeroizing::new([0u8; SCALAR_SIZE]);
            getrandom::getrandom(&mut bytes[..]).map_err(|_| OracleError::Entropy)?;
            if parse_scalar(&bytes).is_ok() {
                return Ok(Self(*bytes));
            }
        }
    }

    /// Same as [`PrivateKey::generate`], drawing from the given RNG.
    pub fn generate_with<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let mut bytes = Zeroizing::new([0u8; SCALAR_SIZE]);
            rng.fill_bytes(&mut bytes[..]);
            if parse_scalar(&bytes).is_ok() {
                return Self(*bytes);
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8; SCALAR_SIZE] {
        &self.0
    }

    pub fn public_key(&self) -> Result<PublicPoint, OracleError> {
        derive_public_key(&self.0)
    }

    pub(crate) fn to_scalar(&self) -> Result<Zeroizing<Scalar>, OracleError> {
        parse_scalar(&self.0)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

/// A one-time signing scalar `k`, the secret behind a nonce R-point.
///
/// # Single use
///
/// A one-time scalar must sign exactly one message. Two signatures `s1 = k - e1*a` and
/// `s2 = k - e2*a` under the same `k` give two equations in two unknowns, and anyone holding both
/// can solve for the long-term private scalar `a`. For that reason this type is neither `Copy` nor
/// `Clone`, [`compute_signature`](crate::crypto::schnorr::compute_signature) takes it by value,
/// and its bytes are wiped on drop. Building one from bytes that were already used is on the
/// caller.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct OneTimeScalar([u8; SCALAR_SIZE]);

impl OneTimeScalar {
    pub fn from_bytes(bytes: [u8; SCALAR_SIZE]) -> Self {
        Self(bytes)
    }

    /// Draws 32 bytes from `rng`. Like [`generate_one_time_scalar`], the draw is not range checked.
    pub fn from_rng<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = Zeroizing::new([0u8; SCALAR_SIZE]);
        rng.fill_bytes(&mut bytes[..]);
        Self(*bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SCALAR_SIZE] {
        &self.0
    }

    /// The R-point `k * G` to publish ahead of signing.
    pub fn public_point(&self) -> Result<PublicPoint, OracleError> {
        derive_public_key(&self.0)
    }

    pub(crate) fn to_scalar(&self) -> Result<Zeroizing<Scalar>, OracleError> {
        parse_scalar(&self.0)
    }
}

impl fmt::Debug for OneTimeScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OneTimeScalar(..)")
    }
}

/// A one-time scalar together with its published R-point.
#[derive(Debug)]
pub struct OneTimeKeypair {
    scalar: OneTimeScalar,
    point: PublicPoint,
}

impl OneTimeKeypair {
    /// Draws a fresh keypair. An out of range draw is reported, not retried.
    pub fn generate() -> Result<Self, OracleError> {
        Self::from_scalar(generate_one_time_scalar()?)
    }

    pub fn from_scalar(scalar: OneTimeScalar) -> Result<Self, OracleError> {
        let point = scalar.public_point()?;
        Ok(Self { scalar, point })
    }

    pub fn point(&self) -> &PublicPoint {
        &self.point
    }

    pub fn into_parts(self) -> (OneTimeScalar, PublicPoint) {
        (self.scalar, self.point)
    }
}
