mod error;
mod key_file;

pub use error::StoreError;
pub use key_file::KeyFile;
