use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::crypto::elliptic_curve::SCALAR_SIZE;
use crate::crypto::PrivateKey;
use crate::store::StoreError;

/// The oracle's long-term key on disk: 64 lowercase hex characters and a trailing newline.
///
/// Readers tolerate surrounding whitespace. The scalar is never truncated, padded or byte-swapped.
/// Writers stage the key in a sibling temporary file, so the key path only ever holds a complete key.
#[derive(Debug, Clone)]
pub struct KeyFile {
    path: PathBuf,
}

impl KeyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads and validates the stored key.
    pub fn load(&self) -> Result<PrivateKey, StoreError> {
        let contents = Zeroizing::new(fs::read_to_string(&self.path)?);
        let bytes = Zeroizing::new(hex::decode(contents.trim())?);
        let bytes: [u8; SCALAR_SIZE] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| StoreError::InvalidLength {
                    expected: SCALAR_SIZE,
                    actual: bytes.len(),
                })?;
        let key = PrivateKey::from_bytes(bytes);
        key.public_key()?;
        debug!(path = %self.path.display(), "loaded oracle key");
        Ok(key)
    }

    /// Writes `key`, atomically replacing any existing file. On unix the file is created owner-only.
    pub fn save(&self, key: &PrivateKey) -> Result<(), StoreError> {
        let staged = self.stage(key)?;
        if let Err(err) = fs::rename(&staged, &self.path) {
            let _ = fs::remove_file(&staged);
            return Err(err.into());
        }
        Ok(())
    }

    /// Loads the stored key, or generates and stores a new one if the file does not exist yet.
    ///
    /// An existing key is never replaced: if another process creates the file first, its key is
    /// loaded and returned instead of the one generated here.
    pub fn load_or_create(&self) -> Result<PrivateKey, StoreError> {
        if self.exists() {
            return self.load();
        }
        self.create()
    }

    fn create(&self) -> Result<PrivateKey, StoreError> {
        let key = PrivateKey::generate()?;
        let staged = self.stage(&key)?;
        // hard_link fails if the key path already exists
        let claimed = fs::hard_link(&staged, &self.path);
        let _ = fs::remove_file(&staged);
        match claimed {
            Ok(()) => {
                info!(path = %self.path.display(), "created new oracle key");
                Ok(key)
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %self.path.display(), "oracle key created concurrently, loading it");
                self.load()
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Writes `key` to a fresh temporary file next to the key path and returns its path.
    fn stage(&self, key: &PrivateKey) -> Result<PathBuf, StoreError> {
        let name = self
            .path
            .file_name()
            .ok_or_else(|| io::Error::new(ErrorKind::InvalidInput, "key file path has no file name"))?;
        let staged = self.path.with_file_name(format!(
            ".{}.{:016x}.tmp",
            name.to_string_lossy(),
            rand::random::<u64>()
        ));
        let contents = Zeroizing::new(format!("{}\n", hex::encode(key.as_bytes())));
        if let Err(err) = write_new(&staged, contents.as_bytes()) {
            let _ = fs::remove_file(&staged);
            return Err(err.into());
        }
        Ok(staged)
    }
}

fn write_new(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}
