use std::fmt;

use digest::Digest;
use elliptic_curve::point::AffineCoordinates;
use elliptic_curve::PrimeField;
use k256::{ProjectivePoint, Scalar};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::crypto::elliptic_curve::SCALAR_SIZE;
use crate::crypto::error::OracleError;
use crate::crypto::keys::{derive_public_key, parse_scalar, OneTimeScalar, PrivateKey, PublicPoint};

/// Challenge `e = SHA-256(message || Rx)` read as a big-endian integer.
///
/// `Rx` enters the hash in minimal big-endian form: leading zero bytes of the X coordinate are
/// dropped. Signatures are only interoperable with other oracle implementations if this holds.
pub(crate) fn challenge(message: &[u8], nonce_x: &[u8]) -> Result<Scalar, OracleError> {
    let start = nonce_x
        .iter()
        .position(|byte| *byte != 0)
        .unwrap_or(nonce_x.len());
    let hash = Sha256::new()
        .chain_update(message)
        .chain_update(&nonce_x[start..])
        .finalize();
    Option::<Scalar>::from(Scalar::from_repr(hash)).ok_or(OracleError::InvalidChallenge)
}

/// Computes the oracle's signature `s = k - e*a mod N` over `message`.
///
/// `private_key` is the long-term scalar `a`, `nonce` the one-time scalar `k` whose R-point was
/// announced for this message. The nonce is consumed; see [`OneTimeScalar`] for why it must never
/// sign a second message.
///
/// `s` is linear in `a` and `k`, which is what allows anyone to compute `s*G` in advance with
/// [`compute_anticipated_point`](crate::crypto::anticipation::compute_anticipated_point).
pub fn compute_signature(
    private_key: &PrivateKey,
    nonce: OneTimeScalar,
    message: &[u8],
) -> Result<Signature, OracleError> {
    let a = private_key.to_scalar()?;
    let k = nonce.to_scalar()?;
    drop(nonce);

    let nonce_x = (ProjectivePoint::GENERATOR * *k).to_affine().x();
    let e = challenge(message, &nonce_x)?;

    let ea = Zeroizing::new(e * *a);
    let s = *k - *ea;
    if bool::from(s.is_zero()) {
        return Err(OracleError::InvalidSignature);
    }

    Ok(Signature(s.to_bytes().into()))
}

/// A published oracle signature: the scalar `s`, 32 bytes big-endian, `0 < s < N`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SCALAR_SIZE]);

impl Signature {
    /// Parses a signature scalar; zero or out of range values are [`OracleError::InvalidSignature`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, OracleError> {
        let bytes: [u8; SCALAR_SIZE] = bytes
            .try_into()
            .map_err(|_| OracleError::InvalidSignature)?;
        parse_scalar(&bytes).map_err(|_| OracleError::InvalidSignature)?;
        Ok(Self(bytes))
    }

    pub fn from_hex(hex: &str) -> Result<Self, OracleError> {
        let bytes = hex::decode(hex.trim()).map_err(|_| OracleError::InvalidSignature)?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SCALAR_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// `s * G`; equals the anticipated point for the signed message.
    pub fn public_point(&self) -> Result<PublicPoint, OracleError> {
        derive_public_key(&self.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = <String>::deserialize(deserializer)?;
        Signature::from_hex(&hex).map_err(|_| serde::de::Error::custom("invalid signature scalar"))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::OsRng;
    use rand::RngCore;

    use super::*;
    use crate::crypto::elliptic_curve::ORDER;
    use crate::crypto::message::encode_numeric_message;

    fn scalar_bytes(hex: &str) -> [u8; SCALAR_SIZE] {
        hex::decode(hex).unwrap().try_into().unwrap()
    }

    fn one_time(hex: &str) -> OneTimeScalar {
        OneTimeScalar::from_bytes(scalar_bytes(hex))
    }

    const PRIVATE_KEY: &str = "0000000000000000000000000000000000000000000000000000000000000001";
    const KNOWN_SIGNATURE: &str = "f486b4e6ee0f10fcebd90ad478a97e427a91cf1cd042aced25657b5558d8e110";
    const SHORT_X_NONCE: &str = "0000000000000000000000000000000000000000000000000000000000000099";
    const SHORT_X_SIGNATURE: &str = "d4113527b4d8cf27748a850fa9256869c9041102effaca894e27dee498724ba5";

    #[test]
    fn test_known_answer() {
        let key = PrivateKey::from_bytes(scalar_bytes(PRIVATE_KEY));
        let nonce = one_time("0000000000000000000000000000000000000000000000000000000000000002");
        let signature = compute_signature(&key, nonce, &encode_numeric_message(1)).unwrap();
        assert_eq!(signature.to_hex(), KNOWN_SIGNATURE);
    }

    #[test]
    fn test_known_answer_short_nonce_x() {
        // k*G has an X coordinate starting with a zero byte
        let key = PrivateKey::from_bytes(scalar_bytes(PRIVATE_KEY));
        let nonce = one_time(SHORT_X_NONCE);
        let signature = compute_signature(&key, nonce, &encode_numeric_message(1)).unwrap();
        assert_eq!(signature.to_hex(), SHORT_X_SIGNATURE);
    }

    #[test]
    fn test_challenge_strips_leading_zeros() {
        let mut x = [0u8; SCALAR_SIZE];
        x[2] = 0xab;
        x[SCALAR_SIZE - 1] = 0x01;
        assert_eq!(challenge(b"m", &x).unwrap(), challenge(b"m", &x[2..]).unwrap());
    }

    #[test]
    fn test_deterministic() {
        let key = PrivateKey::generate_with(&mut OsRng);
        let nonce = OneTimeScalar::from_rng(&mut OsRng);
        let bytes = *nonce.as_bytes();
        let first = compute_signature(&key, nonce, b"outcome").unwrap();
        let second = compute_signature(&key, OneTimeScalar::from_bytes(bytes), b"outcome").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_message_changes_signature() {
        let key = PrivateKey::generate_with(&mut OsRng);
        let nonce = OneTimeScalar::from_rng(&mut OsRng);
        let bytes = *nonce.as_bytes();
        let first = compute_signature(&key, nonce, &encode_numeric_message(1)).unwrap();
        let second =
            compute_signature(&key, OneTimeScalar::from_bytes(bytes), &encode_numeric_message(2)).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_accepts_any_message_length() {
        let key = PrivateKey::generate_with(&mut OsRng);
        for len in [0usize, 1, 31, 33, 1024] {
            let mut message = vec![0u8; len];
            OsRng.fill_bytes(&mut message);
            let nonce = OneTimeScalar::from_rng(&mut OsRng);
            assert!(compute_signature(&key, nonce, &message).is_ok(), "len = {len}");
        }
    }

    #[test]
    fn test_rejects_zero_private_key() {
        let key = PrivateKey::from_bytes([0u8; SCALAR_SIZE]);
        let nonce = OneTimeScalar::from_rng(&mut OsRng);
        assert_eq!(compute_signature(&key, nonce, b"m"), Err(OracleError::InvalidScalar));
    }

    #[test]
    fn test_rejects_out_of_range_scalars() {
        let key = PrivateKey::from_bytes(ORDER);
        let nonce = OneTimeScalar::from_rng(&mut OsRng);
        assert_eq!(compute_signature(&key, nonce, b"m"), Err(OracleError::InvalidScalar));

        let key = PrivateKey::generate_with(&mut OsRng);
        let nonce = OneTimeScalar::from_bytes([0u8; SCALAR_SIZE]);
        assert_eq!(compute_signature(&key, nonce, b"m"), Err(OracleError::InvalidScalar));

        let nonce = OneTimeScalar::from_bytes([0xff; SCALAR_SIZE]);
        assert_eq!(compute_signature(&key, nonce, b"m"), Err(OracleError::InvalidScalar));
    }

    #[test]
    fn test_nonce_reuse_leaks_private_key() {
        // s1 - s2 = (e2 - e1) * a
        let key = PrivateKey::generate_with(&mut OsRng);
        let nonce = OneTimeScalar::from_rng(&mut OsRng);
        let bytes = *nonce.as_bytes();
        let nonce_x = nonce.public_point().unwrap().x().to_vec();

        let s1 = compute_signature(&key, nonce, b"one").unwrap();
        let s2 = compute_signature(&key, OneTimeScalar::from_bytes(bytes), b"two").unwrap();

        let e1 = challenge(b"one", &nonce_x).unwrap();
        let e2 = challenge(b"two", &nonce_x).unwrap();
        let s1 = *parse_scalar(s1.as_bytes()).unwrap();
        let s2 = *parse_scalar(s2.as_bytes()).unwrap();
        let inverse = Option::<Scalar>::from((e2 - e1).invert()).unwrap();
        let recovered = (s1 - s2) * inverse;
        assert_eq!(recovered, *key.to_scalar().unwrap());
    }

    #[test]
    fn test_signature_parsing() {
        let signature = Signature::from_hex(KNOWN_SIGNATURE).unwrap();
        assert_eq!(Signature::from_bytes(signature.as_bytes()).unwrap(), signature);
        assert_eq!(Signature::from_bytes(&[0u8; SCALAR_SIZE]), Err(OracleError::InvalidSignature));
        assert_eq!(Signature::from_bytes(&ORDER), Err(OracleError::InvalidSignature));
        assert_eq!(Signature::from_bytes(&[1u8; 31]), Err(OracleError::InvalidSignature));

        let json = serde_json::to_string(&signature).unwrap();
        assert_eq!(serde_json::from_str::<Signature>(&json).unwrap(), signature);
    }
}
