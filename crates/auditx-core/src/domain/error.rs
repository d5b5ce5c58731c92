//! Domain-level error taxonomy for AuditX.

use auditx_ledger::StorageError;

/// AuditX domain errors.
///
/// The presentation layer distinguishes three user-visible outcomes:
/// - [`AuditError::is_unavailable`]: the ledger could not be reached, retry later
/// - [`AuditError::is_invalid_input`]: malformed risk level, rules or metadata
/// - a successful duplicate receipt: this dataset was already audited
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuditError {
    /// The ledger's backing store was unreachable or timed out.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, AuditError::Ledger(e) if e.is_unavailable())
    }

    /// The caller supplied malformed data; retrying will not help.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            AuditError::InvalidInput(_) | AuditError::Ledger(StorageError::InvalidInput(_))
        )
    }
}

/// Result type for AuditX domain operations.
pub type Result<T> = std::result::Result<T, AuditError>;
