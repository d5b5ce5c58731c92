//! Report assembly: scoring plus the write-once ledger anchor.

use std::sync::Arc;

use auditx_ledger::{
    AuditLedger, AuditRecord, ContentHash, Receipt, RiskLevel, StorageError, Submitter,
};
use tracing::Instrument;

use crate::domain::error::{AuditError, Result};
use crate::domain::factor::FactorScores;
use crate::domain::metadata::MetadataSummary;
use crate::domain::report::AuditReport;
use crate::domain::rule::RuleResult;
use crate::hasher::hash_dataset;
use crate::obs;
use crate::scoring::ScoringEngine;

/// Report together with the ledger receipt that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledAudit {
    pub report: AuditReport,
    pub receipt: Receipt,
}

impl AssembledAudit {
    /// `false` when this exact dataset had already been audited.
    pub fn created(&self) -> bool {
        self.receipt.created()
    }
}

/// Combines [`ScoringEngine`] output with the ledger record for a hash.
///
/// Holds no per-audit state; the same assembler can serve concurrent
/// submissions.
#[derive(Clone)]
pub struct ReportAssembler {
    ledger: Arc<dyn AuditLedger>,
    engine: ScoringEngine,
}

impl ReportAssembler {
    pub fn new(ledger: Arc<dyn AuditLedger>) -> Self {
        Self::with_engine(ledger, ScoringEngine::standard())
    }

    pub fn with_engine(ledger: Arc<dyn AuditLedger>, engine: ScoringEngine) -> Self {
        Self { ledger, engine }
    }

    /// Score the inputs, anchor `(hash, risk_level)` and return the report.
    ///
    /// Input is validated before the ledger is touched, so a malformed
    /// submission never leaves a record behind. Ledger errors are returned
    /// as-is inside [`AuditError::Ledger`].
    pub async fn assemble(
        &self,
        content_hash: &ContentHash,
        rules: &[RuleResult],
        metadata: &MetadataSummary,
        risk_level: i64,
        submitter: &Submitter,
    ) -> Result<AssembledAudit> {
        let risk_level = RiskLevel::try_from(risk_level).map_err(|e| match e {
            StorageError::InvalidInput(reason) => AuditError::InvalidInput(reason),
            other => AuditError::InvalidInput(other.to_string()),
        })?;

        async {
            let factors = self.score(content_hash, rules, metadata)?;

            let receipt = match self.ledger.record(content_hash, risk_level, submitter).await {
                Ok(receipt) => receipt,
                Err(e) => {
                    obs::emit_ledger_error(content_hash, &e);
                    return Err(e.into());
                }
            };

            match &receipt {
                Receipt::Created(record) => {
                    obs::emit_recorded(content_hash, record.risk_level, record.timestamp)
                }
                Receipt::Duplicate(record) => obs::emit_duplicate(content_hash, record.timestamp),
            }

            Ok(AssembledAudit {
                report: build_report(factors, receipt.record()),
                receipt,
            })
        }
        .instrument(obs::audit_span(content_hash))
        .await
    }

    /// Hash the raw dataset bytes, then [`assemble`](Self::assemble).
    pub async fn assemble_dataset(
        &self,
        bytes: &[u8],
        rules: &[RuleResult],
        metadata: &MetadataSummary,
        risk_level: i64,
        submitter: &Submitter,
    ) -> Result<AssembledAudit> {
        let hash = hash_dataset(bytes);
        self.assemble(&hash, rules, metadata, risk_level, submitter)
            .await
    }

    /// Rebuild the report for an already anchored hash without writing.
    ///
    /// Returns `None` when the hash was never recorded.
    pub async fn reconstruct(
        &self,
        content_hash: &ContentHash,
        rules: &[RuleResult],
        metadata: &MetadataSummary,
    ) -> Result<Option<AuditReport>> {
        let factors = self.score(content_hash, rules, metadata)?;
        let record = self.ledger.lookup(content_hash).await.map_err(|e| {
            obs::emit_ledger_error(content_hash, &e);
            AuditError::from(e)
        })?;
        Ok(record.map(|record| build_report(factors, &record)))
    }

    fn score(
        &self,
        content_hash: &ContentHash,
        rules: &[RuleResult],
        metadata: &MetadataSummary,
    ) -> Result<FactorScores> {
        let factors = self.engine.score(rules, metadata)?;
        obs::emit_scored(content_hash, &factors.map(|f| f.score));
        Ok(factors)
    }
}

fn build_report(factors: FactorScores, record: &AuditRecord) -> AuditReport {
    AuditReport {
        content_hash: record.content_hash,
        factors,
        risk_level: record.risk_level,
        timestamp: record.timestamp,
    }
}
