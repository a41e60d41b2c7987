//! Contract-side computation of the point an oracle signature will map to.

use crate::crypto::elliptic_curve::POINT_SIZE;
use crate::crypto::error::OracleError;
use crate::crypto::keys::{parse_point, PublicPoint};
use crate::crypto::schnorr::challenge;

/// Computes `P = R - e*A`, where `e = H(message || Rx)`.
///
/// `oracle` is the oracle's long-term public key `A` and `nonce` the announced R-point. Only public
/// data goes in, yet the result equals `s*G` for the signature `s` the oracle will publish over
/// `message`, so contract participants can lock funds to `P` before the outcome is known.
///
/// Fails with [`OracleError::InvalidPublicKey`] if either input is not a compressed curve point,
/// [`OracleError::InvalidChallenge`] if the challenge is out of range, and
/// [`OracleError::InvalidSignature`] if `P` is the identity (the matching signature would be zero).
pub fn compute_anticipated_point(
    oracle: &[u8; POINT_SIZE],
    nonce: &[u8; POINT_SIZE],
    message: &[u8],
) -> Result<PublicPoint, OracleError> {
    let a = parse_point(oracle)?;
    let r = parse_point(nonce)?;

    let e = challenge(message, &nonce[1..])?;
    let p = r + (-(a * e));

    PublicPoint::from_projective(&p).ok_or(OracleError::InvalidSignature)
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use rand::rngs::OsRng;
    use rand::RngCore;

    use super::*;
    use crate::crypto::elliptic_curve::textbook::Point;
    use crate::crypto::elliptic_curve::{params, SCALAR_SIZE};
    use crate::crypto::keys::{derive_public_key, OneTimeScalar, PrivateKey};
    use crate::crypto::message::encode_numeric_message;
    use crate::crypto::schnorr::compute_signature;

    fn point(hex: &str) -> PublicPoint {
        PublicPoint::from_hex(hex).unwrap()
    }

    fn scalar(value: u8) -> [u8; SCALAR_SIZE] {
        let mut bytes = [0u8; SCALAR_SIZE];
        bytes[SCALAR_SIZE - 1] = value;
        bytes
    }

    #[test]
    fn test_known_answer() {
        let oracle = derive_public_key(&scalar(1)).unwrap();
        let nonce = derive_public_key(&scalar(2)).unwrap();
        let anticipated =
            compute_anticipated_point(oracle.as_bytes(), nonce.as_bytes(), &encode_numeric_message(1)).unwrap();
        assert_eq!(
            anticipated,
            point("03011230e0b59aed1ab8d0571af4616af51edba55f3592d3a7b193eb7fb75216f3")
        );
    }

    #[test]
    fn test_known_answer_short_nonce_x() {
        let oracle = derive_public_key(&scalar(1)).unwrap();
        let nonce = derive_public_key(&scalar(0x99)).unwrap();
        assert_eq!(nonce.x()[0], 0);
        let anticipated =
            compute_anticipated_point(oracle.as_bytes(), nonce.as_bytes(), &encode_numeric_message(1)).unwrap();
        assert_eq!(
            anticipated,
            point("030e644e08b920ea6e21f15247e7b5a67fb1fcf2562d4e1e5f62d3cf6bb6e54e19")
        );
    }

    #[test]
    fn test_matches_signature_point() {
        let key = PrivateKey::generate_with(&mut OsRng);
        let oracle = key.public_key().unwrap();
        for value in [0u64, 1, 7, u64::MAX] {
            let nonce = OneTimeScalar::from_rng(&mut OsRng);
            let nonce_point = nonce.public_point().unwrap();
            let message = encode_numeric_message(value);

            let signature = compute_signature(&key, nonce, &message).unwrap();
            let anticipated =
                compute_anticipated_point(oracle.as_bytes(), nonce_point.as_bytes(), &message).unwrap();
            assert_eq!(signature.public_point().unwrap(), anticipated, "value = {value}");
        }
    }

    #[test]
    fn test_matches_textbook_arithmetic() {
        let params = params();
        for _ in 0..8 {
            let oracle = PrivateKey::generate_with(&mut OsRng).public_key().unwrap();
            let nonce = PrivateKey::generate_with(&mut OsRng).public_key().unwrap();
            let mut message = [0u8; 32];
            OsRng.fill_bytes(&mut message);

            let e = challenge(&message, nonce.x()).unwrap();
            let e = BigUint::from_bytes_be(&e.to_bytes());
            let a = Point::decompress(oracle.as_bytes()).unwrap();
            let r = Point::decompress(nonce.as_bytes()).unwrap();
            let expected = r.add(&a.mul(&e, params).negate(params), params);

            let anticipated = compute_anticipated_point(oracle.as_bytes(), nonce.as_bytes(), &message).unwrap();
            assert_eq!(anticipated.as_bytes(), &expected.compress());
        }
    }

    #[test]
    fn test_deterministic() {
        let oracle = PrivateKey::generate_with(&mut OsRng).public_key().unwrap();
        let nonce = PrivateKey::generate_with(&mut OsRng).public_key().unwrap();
        let first = compute_anticipated_point(oracle.as_bytes(), nonce.as_bytes(), b"outcome").unwrap();
        let second = compute_anticipated_point(oracle.as_bytes(), nonce.as_bytes(), b"outcome").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_uncompressed_prefix() {
        let oracle = PrivateKey::generate_with(&mut OsRng).public_key().unwrap();
        let nonce = PrivateKey::generate_with(&mut OsRng).public_key().unwrap();

        let mut bad = *oracle.as_bytes();
        bad[0] = 0x04;
        assert_eq!(
            compute_anticipated_point(&bad, nonce.as_bytes(), b"m"),
            Err(OracleError::InvalidPublicKey)
        );

        let mut bad = *nonce.as_bytes();
        bad[0] = 0x04;
        assert_eq!(
            compute_anticipated_point(oracle.as_bytes(), &bad, b"m"),
            Err(OracleError::InvalidPublicKey)
        );
    }

    #[test]
    fn test_rejects_point_off_curve() {
        let nonce = PrivateKey::generate_with(&mut OsRng).public_key().unwrap();
        // x = 5 has no point on secp256k1: 5^3 + 7 = 132 is not a square mod p
        let mut off_curve = [0u8; POINT_SIZE];
        off_curve[0] = 0x02;
        off_curve[POINT_SIZE - 1] = 5;
        assert!(Point::decompress(&off_curve).is_none());
        assert_eq!(
            compute_anticipated_point(&off_curve, nonce.as_bytes(), b"m"),
            Err(OracleError::InvalidPublicKey)
        );
        assert_eq!(
            compute_anticipated_point(&[0u8; POINT_SIZE], nonce.as_bytes(), b"m"),
            Err(OracleError::InvalidPublicKey)
        );
    }
}
