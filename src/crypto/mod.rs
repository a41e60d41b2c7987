pub mod anticipation;
pub mod elliptic_curve;
pub mod error;
pub mod keys;
pub mod message;
pub mod schnorr;

pub use anticipation::compute_anticipated_point;
pub use error::OracleError;
pub use keys::{derive_public_key, generate_one_time_scalar, OneTimeKeypair, OneTimeScalar, PrivateKey, PublicPoint};
pub use message::{decode_numeric_message, encode_numeric_message, MESSAGE_SIZE};
pub use schnorr::{compute_signature, Signature};
