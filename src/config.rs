use std::path::PathBuf;

use serde::Deserialize;

/// Settings for [`generate_to_dir`](crate::service::vectors::generate_to_dir).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VectorConfig {
    /// Number of (nonce, message) tuples to produce
    pub count: usize,
    /// Directory the hex files are written to. Created if missing; existing vector files in it are
    /// overwritten and anything else is left alone
    pub output_dir: PathBuf,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            count: 100_000,
            output_dir: PathBuf::from("testdata"),
        }
    }
}
