//! AuditX Core Library
//!
//! Dataset hashing, the seven-factor quality scoring engine, the compliance
//! risk band and report assembly over an [`auditx_ledger::AuditLedger`].

pub mod assembler;
pub mod compliance;
pub mod domain;
pub mod hasher;
pub mod obs;
pub mod reporting;
pub mod scoring;
pub mod telemetry;

pub use domain::{
    AuditError, AuditReport, ColumnStats, FactorName, FactorScores, MetadataSummary,
    QualityFactor, Result, RuleResult, Severity,
};

pub use auditx_ledger::{
    AuditLedger, AuditRecord, ContentHash, Receipt, RiskLevel, StorageError, Submitter,
};

pub use assembler::{AssembledAudit, ReportAssembler};
pub use compliance::{compliance_score, ComplianceScore, RiskBand};
pub use hasher::{hash_dataset, hash_file, hash_reader};
pub use reporting::{write_report_json, ReportArtifact, REPORT_SCHEMA_VERSION};
pub use scoring::{score, Deduction, ScoringEngine, STANDARD_DEDUCTIONS};

pub use obs::{emit_duplicate, emit_ledger_error, emit_recorded, emit_scored, audit_span};
pub use telemetry::init_tracing;

/// AuditX version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
