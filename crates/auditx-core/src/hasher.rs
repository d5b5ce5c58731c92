//! Canonical content digest for uploaded datasets.
//!
//! The digest is SHA-256 over the raw bytes exactly as uploaded: no newline,
//! encoding, or column normalisation. Byte-identical uploads share a hash;
//! any byte change yields a different one.

use std::io::Read;
use std::path::Path;

use auditx_ledger::ContentHash;
use sha2::{Digest, Sha256};

/// Hash an in-memory dataset. Total over any input, including empty.
pub fn hash_dataset(bytes: &[u8]) -> ContentHash {
    ContentHash::from_bytes(bytes)
}

/// Hash a dataset from a reader without buffering it whole.
pub fn hash_reader<R: Read>(mut reader: R) -> std::io::Result<ContentHash> {
    let mut hasher = Sha256::new();
    std::io::copy(&mut reader, &mut hasher)?;
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    Ok(ContentHash::from_digest(digest))
}

/// Hash a dataset file on disk.
pub fn hash_file(path: &Path) -> std::io::Result<ContentHash> {
    let file = std::fs::File::open(path)?;
    hash_reader(std::io::BufReader::new(file))
}
