use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crypto::{
    compute_anticipated_point, compute_signature, encode_numeric_message, OneTimeKeypair, OneTimeScalar,
    OracleError, PrivateKey, PublicPoint, Signature,
};

pub mod vectors;

/// A signed numeric outcome, as the oracle publishes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    pub value: u64,
    pub nonce_point: PublicPoint,
    pub signature: Signature,
}

impl Attestation {
    /// Whether `signature * G` is the point a contract built against `oracle` and this R-point
    /// anticipated for `value`.
    pub fn settles(&self, oracle: &PublicPoint) -> Result<bool, OracleError> {
        let anticipated = anticipate(oracle, &self.nonce_point, self.value)?;
        Ok(self.signature.public_point()? == anticipated)
    }
}

/// The oracle side: owns the long-term key and turns announced one-time keys into attestations.
#[derive(Debug)]
pub struct OracleService {
    key: PrivateKey,
    public_key: PublicPoint,
}

impl OracleService {
    /// Fails with [`OracleError::InvalidScalar`] if `key` is not a usable scalar.
    pub fn new(key: PrivateKey) -> Result<Self, OracleError> {
        let public_key = key.public_key()?;
        Ok(Self { key, public_key })
    }

    pub fn public_key(&self) -> &PublicPoint {
        &self.public_key
    }

    /// Draws the one-time keypair for an upcoming outcome. Publish the point, keep the scalar for
    /// exactly one call to [`OracleService::attest`].
    pub fn announce(&self) -> Result<OneTimeKeypair, OracleError> {
        let keypair = OneTimeKeypair::generate()?;
        debug!(nonce_point = %keypair.point(), "announced one-time key");
        Ok(keypair)
    }

    /// Signs the numeric outcome `value` with the announced one-time scalar, consuming it.
    pub fn attest(&self, nonce: OneTimeScalar, value: u64) -> Result<Attestation, OracleError> {
        let nonce_point = nonce.public_point()?;
        let signature = compute_signature(&self.key, nonce, &encode_numeric_message(value))?;
        debug!(value, nonce_point = %nonce_point, "attested outcome");
        Ok(Attestation {
            value,
            nonce_point,
            signature,
        })
    }
}

/// The contract side: the point an attestation of `value` under `nonce_point` will map to.
pub fn anticipate(oracle: &PublicPoint, nonce_point: &PublicPoint, value: u64) -> Result<PublicPoint, OracleError> {
    compute_anticipated_point(oracle.as_bytes(), nonce_point.as_bytes(), &encode_numeric_message(value))
}
