//! Storage trait definitions for AuditX
//!
//! - `ContentHash`: 32-byte SHA-256 digest identifying one dataset snapshot
//! - `AuditRecord`: the anchored outcome for one content hash
//! - `AuditLedger`: write-once, content-addressed record/lookup
//!
//! The trait is async and backend-agnostic. An in-memory fake is provided
//! in the `fakes` module; `surreal_ledger` provides the persistent backend.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::StorageError;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// ---------------------------------------------------------------------------
// ContentHash
// ---------------------------------------------------------------------------

/// SHA-256 digest of a dataset's raw bytes.
///
/// Serialized as 64 lowercase hex characters. Parsing through
/// `TryFrom<&str>` also accepts upper-case digits and a `0x` prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Length of the digest in bytes.
    pub const LEN: usize = 32;

    /// Compute the SHA-256 digest of the given bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        Self::from_digest(digest)
    }

    /// Wrap an already computed 32-byte digest.
    pub fn from_digest(digest: [u8; 32]) -> Self {
        ContentHash(digest)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short form (first 12 hex chars).
    pub fn short(&self) -> String {
        hex::encode(&self.0[..6])
    }
}

impl TryFrom<&str> for ContentHash {
    type Error = StorageError;

    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        let trimmed = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let mut bytes = [0u8; 32];
        if trimmed.len() != 64 || hex::decode_to_slice(trimmed, &mut bytes).is_err() {
            return Err(StorageError::InvalidDigest {
                digest: s.to_string(),
            });
        }
        Ok(ContentHash(bytes))
    }
}

impl TryFrom<String> for ContentHash {
    type Error = StorageError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        ContentHash::try_from(s.as_str())
    }
}

impl std::str::FromStr for ContentHash {
    type Err = StorageError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ContentHash::try_from(s)
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContentHash({})", self.to_hex())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ContentHash::try_from(s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// AuditRecord
// ---------------------------------------------------------------------------

/// Ordinal severity attached to an audit record. Always `>= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskLevel(u32);

impl RiskLevel {
    pub const fn new(level: u32) -> Self {
        RiskLevel(level)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for RiskLevel {
    type Error = StorageError;

    fn try_from(level: i64) -> std::result::Result<Self, Self::Error> {
        u32::try_from(level).map(RiskLevel).map_err(|_| {
            StorageError::InvalidInput(format!("risk level must be in 0..={}, got {level}", u32::MAX))
        })
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of whoever submitted a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submitter(String);

impl Submitter {
    pub fn new(id: impl Into<String>) -> Self {
        Submitter(id.into())
    }

    pub fn anonymous() -> Self {
        Submitter("anonymous".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Submitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The anchored outcome of one dataset audit.
///
/// Created once per distinct content hash and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub content_hash: ContentHash,
    pub risk_level: RiskLevel,
    /// Epoch seconds at creation
    pub timestamp: i64,
    pub submitter: Submitter,
}

/// Outcome of [`AuditLedger::record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "record", rename_all = "snake_case")]
pub enum Receipt {
    /// This call anchored the hash; carries the new record.
    Created(AuditRecord),
    /// The hash was already anchored; carries the original, unchanged record.
    Duplicate(AuditRecord),
}

impl Receipt {
    /// Whether this submission was the first for its hash.
    pub fn created(&self) -> bool {
        matches!(self, Receipt::Created(_))
    }

    /// The record now stored under the hash (new or pre-existing).
    pub fn record(&self) -> &AuditRecord {
        match self {
            Receipt::Created(r) | Receipt::Duplicate(r) => r,
        }
    }

    pub fn into_record(self) -> AuditRecord {
        match self {
            Receipt::Created(r) | Receipt::Duplicate(r) => r,
        }
    }
}

// ---------------------------------------------------------------------------
// AuditLedger
// ---------------------------------------------------------------------------

/// Write-once, content-addressed audit ledger.
///
/// Guarantees:
/// - At most one `AuditRecord` exists per `ContentHash`; its fields, including
///   the timestamp, never change after creation.
/// - Concurrent `record` calls for the same hash are serialized: exactly one
///   observes `Receipt::Created`, every other caller gets `Receipt::Duplicate`
///   carrying the winner's record.
/// - `lookup` after a successful `record` returns exactly that record.
/// - Backend unreachability surfaces as `StorageError::Unavailable`, never as
///   a `None` lookup.
#[async_trait]
pub trait AuditLedger: Send + Sync {
    /// Anchor `hash` with the given outcome if it is not anchored yet.
    async fn record(
        &self,
        hash: &ContentHash,
        risk_level: RiskLevel,
        submitter: &Submitter,
    ) -> StorageResult<Receipt>;

    /// Read the record for `hash`. `Ok(None)` when nothing was recorded.
    async fn lookup(&self, hash: &ContentHash) -> StorageResult<Option<AuditRecord>>;
}
