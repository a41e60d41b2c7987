//! Conformance vectors for cross-checking other oracle implementations.
//!
//! One fixed oracle key signs many random messages, each under a fresh one-time key. Every tuple
//! records the signature together with `s*G` computed from the signature and from public data
//! alone; the two must match.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::{debug, info};

use crate::config::VectorConfig;
use crate::crypto::elliptic_curve::SCALAR_SIZE;
use crate::crypto::{
    compute_anticipated_point, compute_signature, MESSAGE_SIZE, OneTimeScalar, OracleError, PrivateKey,
    PublicPoint, Signature,
};
use crate::store::KeyFile;

pub const PRIVATE_KEY_FILE: &str = "privkey.hex";
pub const ONE_TIME_KEYS_FILE: &str = "one-time-signing-keys.hex";
pub const MESSAGES_FILE: &str = "messages.hex";
pub const SIGNATURES_FILE: &str = "signatures.hex";
pub const PUBKEYS_FROM_SIGNATURE_FILE: &str = "signature-pubkeys-from-sig.hex";
pub const PUBKEYS_FROM_MESSAGE_FILE: &str = "signature-pubkeys-from-message.hex";

const PROGRESS_INTERVAL: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorEntry {
    pub one_time_key: [u8; SCALAR_SIZE],
    pub message: [u8; MESSAGE_SIZE],
    pub signature: Signature,
    pub pubkey_from_signature: PublicPoint,
    pub pubkey_from_message: PublicPoint,
}

#[derive(Debug)]
pub struct VectorSet {
    pub private_key: PrivateKey,
    pub entries: Vec<VectorEntry>,
}

/// First tuple that does not reproduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VectorMismatch {
    #[error("vector {index}: {source}")]
    Failed {
        index: usize,
        #[source]
        source: OracleError,
    },

    #[error("vector {index}: {field} does not match")]
    Mismatch { index: usize, field: &'static str },
}

fn entry(
    key: &PrivateKey,
    oracle: &PublicPoint,
    nonce: OneTimeScalar,
    message: [u8; MESSAGE_SIZE],
) -> Result<VectorEntry, OracleError> {
    let one_time_key = *nonce.as_bytes();
    let nonce_point = nonce.public_point()?;
    let signature = compute_signature(key, nonce, &message)?;
    Ok(VectorEntry {
        one_time_key,
        message,
        signature,
        pubkey_from_signature: signature.public_point()?,
        pubkey_from_message: compute_anticipated_point(oracle.as_bytes(), nonce_point.as_bytes(), &message)?,
    })
}

/// Signs `count` random 32-byte messages with `private_key`, each under a fresh one-time key
/// drawn from `rng`.
pub fn generate<R: RngCore + CryptoRng + ?Sized>(
    private_key: PrivateKey,
    count: usize,
    rng: &mut R,
) -> Result<VectorSet, OracleError> {
    let oracle = private_key.public_key()?;
    let mut entries = Vec::with_capacity(count);
    for index in 0..count {
        let nonce = OneTimeScalar::from_rng(rng);
        let mut message = [0u8; MESSAGE_SIZE];
        rng.fill_bytes(&mut message);
        entries.push(entry(&private_key, &oracle, nonce, message)?);

        if (index + 1) % PROGRESS_INTERVAL == 0 {
            debug!(done = index + 1, total = count, "generating vectors");
        }
    }
    Ok(VectorSet { private_key, entries })
}

impl VectorSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recomputes every tuple from the private key, one-time key and message.
    pub fn verify(&self) -> Result<(), VectorMismatch> {
        let oracle = self
            .private_key
            .public_key()
            .map_err(|source| VectorMismatch::Failed { index: 0, source })?;

        for (index, expected) in self.entries.iter().enumerate() {
            let nonce = OneTimeScalar::from_bytes(expected.one_time_key);
            let actual = entry(&self.private_key, &oracle, nonce, expected.message)
                .map_err(|source| VectorMismatch::Failed { index, source })?;

            let field = if actual.signature != expected.signature {
                Some("signature")
            } else if actual.pubkey_from_signature != expected.pubkey_from_signature {
                Some("signature pubkey from signature")
            } else if actual.pubkey_from_message != expected.pubkey_from_message {
                Some("signature pubkey from message")
            } else if expected.pubkey_from_signature != expected.pubkey_from_message {
                Some("signature pubkey equivalence")
            } else {
                None
            };
            if let Some(field) = field {
                return Err(VectorMismatch::Mismatch { index, field });
            }
        }
        Ok(())
    }

    /// Writes one hex file per column, one line per tuple, creating `dir` if needed.
    pub fn write_to_dir(&self, dir: &Path) -> anyhow::Result<()> {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        KeyFile::new(dir.join(PRIVATE_KEY_FILE))
            .save(&self.private_key)
            .context("writing private key")?;

        write_lines(dir, ONE_TIME_KEYS_FILE, self.entries.iter().map(|e| hex::encode(e.one_time_key)))?;
        write_lines(dir, MESSAGES_FILE, self.entries.iter().map(|e| hex::encode(e.message)))?;
        write_lines(dir, SIGNATURES_FILE, self.entries.iter().map(|e| e.signature.to_hex()))?;
        write_lines(
            dir,
            PUBKEYS_FROM_SIGNATURE_FILE,
            self.entries.iter().map(|e| e.pubkey_from_signature.to_hex()),
        )?;
        write_lines(
            dir,
            PUBKEYS_FROM_MESSAGE_FILE,
            self.entries.iter().map(|e| e.pubkey_from_message.to_hex()),
        )?;
        Ok(())
    }

    /// Reads a vector directory written by [`VectorSet::write_to_dir`] or by another implementation
    /// using the same layout.
    pub fn read_from_dir(dir: &Path) -> anyhow::Result<Self> {
        let private_key = KeyFile::new(dir.join(PRIVATE_KEY_FILE))
            .load()
            .context("reading private key")?;

        let one_time_keys = read_lines(dir, ONE_TIME_KEYS_FILE)?;
        let messages = read_lines(dir, MESSAGES_FILE)?;
        let signatures = read_lines(dir, SIGNATURES_FILE)?;
        let from_signature = read_lines(dir, PUBKEYS_FROM_SIGNATURE_FILE)?;
        let from_message = read_lines(dir, PUBKEYS_FROM_MESSAGE_FILE)?;

        let count = one_time_keys.len();
        for (name, lines) in [
            (MESSAGES_FILE, &messages),
            (SIGNATURES_FILE, &signatures),
            (PUBKEYS_FROM_SIGNATURE_FILE, &from_signature),
            (PUBKEYS_FROM_MESSAGE_FILE, &from_message),
        ] {
            if lines.len() != count {
                bail!("{name} has {} lines, expected {count}", lines.len());
            }
        }

        let mut entries = Vec::with_capacity(count);
        for index in 0..count {
            let line = index + 1;
            entries.push(VectorEntry {
                one_time_key: decode_array(&one_time_keys[index])
                    .with_context(|| format!("{ONE_TIME_KEYS_FILE} line {line}"))?,
                message: decode_array(&messages[index]).with_context(|| format!("{MESSAGES_FILE} line {line}"))?,
                signature: Signature::from_hex(&signatures[index])
                    .with_context(|| format!("{SIGNATURES_FILE} line {line}"))?,
                pubkey_from_signature: PublicPoint::from_hex(&from_signature[index])
                    .with_context(|| format!("{PUBKEYS_FROM_SIGNATURE_FILE} line {line}"))?,
                pubkey_from_message: PublicPoint::from_hex(&from_message[index])
                    .with_context(|| format!("{PUBKEYS_FROM_MESSAGE_FILE} line {line}"))?,
            });
        }
        Ok(Self { private_key, entries })
    }
}

/// Generates `config.count` vectors under a fresh oracle key and writes them to `config.output_dir`.
pub fn generate_to_dir(config: &VectorConfig) -> anyhow::Result<VectorSet> {
    info!(count = config.count, dir = %config.output_dir.display(), "generating conformance vectors");
    let private_key = PrivateKey::generate()?;
    let set = generate(private_key, config.count, &mut OsRng)?;
    set.write_to_dir(&config.output_dir)?;
    info!(count = set.len(), dir = %config.output_dir.display(), "wrote conformance vectors");
    Ok(set)
}

fn write_lines(dir: &Path, name: &str, lines: impl Iterator<Item = String>) -> anyhow::Result<()> {
    let path = dir.join(name);
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}

fn read_lines(dir: &Path, name: &str) -> anyhow::Result<Vec<String>> {
    let path = dir.join(name);
    let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    let mut lines = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    Ok(lines)
}

fn decode_array<const N: usize>(hex: &str) -> anyhow::Result<[u8; N]> {
    let bytes = hex::decode(hex)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected {N} bytes, got {len}"))
}
