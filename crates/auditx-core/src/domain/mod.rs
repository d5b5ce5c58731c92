//! Domain models for AuditX.
//!
//! Canonical definitions for the core entities:
//! - `RuleResult`: externally evaluated check outcome
//! - `MetadataSummary`: per-column dataset statistics
//! - `QualityFactor`: one of seven normalized quality scores
//! - `AuditReport`: ledger record + factor scores

pub mod error;
pub mod factor;
pub mod metadata;
pub mod report;
pub mod rule;

// Re-export main types and errors
pub use error::{AuditError, Result};
pub use factor::{FactorName, FactorScores, QualityFactor};
pub use metadata::{ColumnStats, MetadataSummary};
pub use report::AuditReport;
pub use rule::{RuleResult, Severity};
