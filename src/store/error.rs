use crate::crypto::OracleError;

/// Failures of the key file store. None of them carry key material.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the key file failed
    #[error("key file io error")]
    Io(#[from] std::io::Error),

    /// The key file does not hold a hex string
    #[error("key file is not valid hex")]
    InvalidHex(#[from] hex::FromHexError),

    /// The key file decodes to the wrong number of bytes; never truncated or padded
    #[error("key file holds {actual} bytes, expected {expected}")]
    InvalidLength { expected: usize, actual: usize },

    /// The stored scalar is not a usable key, or a new one could not be generated
    #[error(transparent)]
    Key(#[from] OracleError),
}
