//! Downloadable report artifact.
//!
//! [`ReportArtifact`] flattens an [`AuditReport`] into a versioned JSON shape
//! for the presentation layer; [`write_report_json`] persists it.

use anyhow::{Context, Result};
use auditx_ledger::Receipt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::factor::FactorName;
use crate::domain::report::AuditReport;

/// Current layout version of the persisted report artifact.
pub const REPORT_SCHEMA_VERSION: &str = "1.0";

/// One factor line in the artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FactorArtifact {
    pub name: FactorName,
    pub score: u8,
}

/// Audit report as written to disk for downstream consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportArtifact {
    pub schema_version: String,
    pub content_hash: String,
    pub factors: Vec<FactorArtifact>,
    pub risk_level: u32,
    pub timestamp: i64,
    /// RFC3339 rendering of `timestamp`
    pub recorded_at: DateTime<Utc>,
    /// Whether this submission hit an existing ledger record
    pub duplicate: bool,
}

impl ReportArtifact {
    pub fn new(report: &AuditReport, duplicate: bool) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            content_hash: report.content_hash.to_hex(),
            factors: report
                .factors
                .iter()
                .map(|f| FactorArtifact {
                    name: f.name,
                    score: f.score,
                })
                .collect(),
            risk_level: report.risk_level.value(),
            timestamp: report.timestamp,
            recorded_at: DateTime::from_timestamp(report.timestamp, 0).unwrap_or_default(),
            duplicate,
        }
    }

    pub fn from_receipt(report: &AuditReport, receipt: &Receipt) -> Self {
        Self::new(report, !receipt.created())
    }
}

/// Write the report artifact as pretty JSON.
pub fn write_report_json(path: &Path, artifact: &ReportArtifact) -> Result<()> {
    let content = serde_json::to_string_pretty(artifact).context("serialize report artifact")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}
