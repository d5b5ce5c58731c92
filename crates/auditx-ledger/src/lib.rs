//! AuditX Ledger: write-once, content-addressed audit persistence
//!
//! This crate anchors the outcome of a dataset audit under the dataset's
//! content hash so that it cannot be silently altered afterwards.
//!
//! ## Layer 0 - Data/Persistence
//!
//! Focus: write-once integrity, atomic check-and-create, bounded failure.
//!
//! ## Key Components
//!
//! - `AuditLedger`: record/lookup contract shared by all backends
//! - `MemoryAuditLedger`: in-memory fake for tests and embedding
//! - `SurrealAuditLedger`: SurrealDB backend (mem, surrealkv, remote ws)

mod config;
mod error;
pub mod fakes;
mod migrations;
mod schema;
pub mod storage_traits;
pub mod surreal_ledger;

pub use config::{Credentials, LedgerConfig, DEFAULT_LOCAL_PATH, DEFAULT_TIMEOUT};
pub use error::{StateError, StorageError};
pub use schema::AuditRecordRow;
pub use storage_traits::{
    AuditLedger, AuditRecord, ContentHash, Receipt, RiskLevel, StorageResult, Submitter,
};
pub use surreal_ledger::SurrealAuditLedger;

/// Result type for backend setup operations
pub type Result<T> = std::result::Result<T, StateError>;
