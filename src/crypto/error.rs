
/// Failures of the signing core. None of them carry key material, and none are retried internally:
/// the caller decides whether to draw a fresh one-time keypair and try again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// A private scalar or nonce is zero or not below the curve order
    #[error("scalar is zero or out of range")]
    InvalidScalar,

    /// A compressed point buffer does not decode to a point on the curve
    #[error("invalid public key encoding")]
    InvalidPublicKey,

    /// `SHA-256(m || Rx)` is not below the curve order, roughly once every 2^128 messages
    #[error("hash of (message, R) is out of range")]
    InvalidChallenge,

    /// The signature scalar came out as zero, roughly once every 2^256 signatures
    #[error("signature scalar is zero")]
    InvalidSignature,

    /// The operating system random source could not be read
    #[error("entropy source unavailable")]
    Entropy,
}
