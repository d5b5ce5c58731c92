use auditx_ledger::{ContentHash, RiskLevel};
use serde::{Deserialize, Serialize};

use crate::domain::factor::{FactorName, FactorScores};

/// Combined, read-only outcome of one dataset audit.
///
/// `risk_level` and `timestamp` are those of the anchored ledger record, so a
/// resubmission reports the original outcome rather than the resubmitted one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub content_hash: ContentHash,
    pub factors: FactorScores,
    pub risk_level: RiskLevel,
    /// Epoch seconds of the ledger record
    pub timestamp: i64,
}

impl AuditReport {
    /// Score of a single factor.
    pub fn score(&self, name: FactorName) -> u8 {
        self.factors[name.index()].score
    }
}
