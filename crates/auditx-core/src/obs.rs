//! Structured observability hooks for the audit pipeline.
//!
//! Every stage of an audit emits one event keyed by `event = "audit.*"`.
//! Filter with `AUDITX_LOG` (or `RUST_LOG`); pass `--json` to the CLI for
//! newline-delimited JSON.

use auditx_ledger::{ContentHash, RiskLevel};
use tracing::{info, warn};

/// Span that scopes every log line of one audit to its content hash.
///
/// Attach it to the audit future with [`tracing::Instrument`] so it is only
/// entered while that future is polled.
pub fn audit_span(hash: &ContentHash) -> tracing::Span {
    tracing::info_span!("auditx.audit", content_hash = %hash.short())
}

/// Factor scores computed for a dataset.
pub fn emit_scored(hash: &ContentHash, scores: &[u8]) {
    info!(event = "audit.scored", content_hash = %hash, scores = ?scores);
}

/// First submission of a hash was anchored.
pub fn emit_recorded(hash: &ContentHash, risk_level: RiskLevel, timestamp: i64) {
    info!(
        event = "audit.recorded",
        content_hash = %hash,
        risk_level = risk_level.value(),
        timestamp = timestamp,
    );
}

/// Resubmission; the ledger kept the original record.
pub fn emit_duplicate(hash: &ContentHash, original_timestamp: i64) {
    info!(
        event = "audit.duplicate",
        content_hash = %hash,
        original_timestamp = original_timestamp,
    );
}

/// Ledger call failed (warning level).
pub fn emit_ledger_error(hash: &ContentHash, error: &dyn std::fmt::Display) {
    warn!(event = "audit.ledger_error", content_hash = %hash, error = %error);
}
