//! Error types for auditx-ledger

use thiserror::Error;

/// Errors raised while opening or initialising a ledger backend
#[derive(Error, Debug)]
pub enum StateError {
    /// Database connection error
    #[error("Database connection failed: {0}")]
    Connection(String),

    /// Database query error
    #[error("Database query failed: {0}")]
    Query(String),

    /// Serialization error
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Schema setup error
    #[error("Schema setup failed: {0}")]
    SchemaSetup(String),
}

impl From<surrealdb::Error> for StateError {
    fn from(err: surrealdb::Error) -> Self {
        StateError::Query(err.to_string())
    }
}

impl From<serde_json::Error> for StateError {
    fn from(err: serde_json::Error) -> Self {
        StateError::Serialization(err.to_string())
    }
}

/// Errors returned by [`crate::AuditLedger`] operations.
///
/// A lookup miss is not an error: `lookup` returns `Ok(None)`.
/// A duplicate `record` is not an error either: it yields
/// [`crate::Receipt::Duplicate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backing store could not be reached, or a write could not be
    /// confirmed within the configured timeout. Callers retry with backoff.
    #[error("ledger unavailable: {reason}")]
    Unavailable { reason: String },

    /// Malformed input (e.g. a negative risk level)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A string that is not a 32-byte hex digest
    #[error("invalid content hash: {digest}")]
    InvalidDigest { digest: String },

    /// The backend answered but the answer could not be interpreted
    #[error("backend error: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        StorageError::Unavailable {
            reason: reason.into(),
        }
    }

    /// True for failures the caller should retry.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StorageError::Unavailable { .. })
    }
}
