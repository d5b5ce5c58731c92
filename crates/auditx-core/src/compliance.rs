//! Severity-weighted compliance score and the risk band derived from it.
//!
//! This is the figure anchored in the ledger as the record's risk level when
//! the caller does not supply one explicitly.

use auditx_ledger::RiskLevel;
use serde::{Deserialize, Serialize};

use crate::domain::rule::{RuleResult, Severity};

impl Severity {
    /// Points a failed rule of this severity removes from the compliance score.
    pub fn deduction(self) -> u32 {
        match self {
            Severity::High => 30,
            Severity::Medium => 15,
            Severity::Low => 5,
        }
    }
}

/// Coarse risk classification of a compliance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskBand {
    Green,
    Yellow,
    Red,
}

impl RiskBand {
    /// `>= 85` is green, `>= 50` yellow, anything lower red.
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => RiskBand::Green,
            50..=84 => RiskBand::Yellow,
            _ => RiskBand::Red,
        }
    }

    /// Ledger encoding: green 0, yellow 1, red 2.
    pub fn risk_level(self) -> RiskLevel {
        match self {
            RiskBand::Green => RiskLevel::new(0),
            RiskBand::Yellow => RiskLevel::new(1),
            RiskBand::Red => RiskLevel::new(2),
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskBand::Green => "GREEN",
            RiskBand::Yellow => "YELLOW",
            RiskBand::Red => "RED",
        };
        f.write_str(s)
    }
}

/// Overall compliance score with an explanation per deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceScore {
    pub final_score: u8,
    pub risk_band: RiskBand,
    pub breakdown: Vec<String>,
}

/// Start at 100, subtract per failed rule by severity, clamp at 0.
///
/// Failed rules without a severity cost nothing but still appear in the
/// breakdown.
pub fn compliance_score(rules: &[RuleResult]) -> ComplianceScore {
    let mut lost = 0u32;
    let mut breakdown = Vec::new();

    for rule in rules.iter().filter(|r| !r.passed) {
        let deduction = rule.severity.map(Severity::deduction).unwrap_or(0);
        lost += deduction;

        let severity = rule
            .severity
            .map(|s| format!("{s:?}").to_uppercase())
            .unwrap_or_else(|| "UNRATED".to_string());
        let mut line = format!("Rule {} ({severity}) failed: -{deduction} points.", rule.rule_id);
        if let Some(description) = &rule.description {
            line.push(' ');
            line.push_str(description);
        }
        breakdown.push(line);
    }

    let final_score = 100u32.saturating_sub(lost) as u8;
    ComplianceScore {
        final_score,
        risk_band: RiskBand::from_score(final_score),
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_dataset_is_green() {
        let score = compliance_score(&[RuleResult::passed("RULE_001")]);
        assert_eq!(score.final_score, 100);
        assert_eq!(score.risk_band, RiskBand::Green);
        assert!(score.breakdown.is_empty());
        assert_eq!(score.risk_band.risk_level(), RiskLevel::new(0));
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(RiskBand::from_score(85), RiskBand::Green);
        assert_eq!(RiskBand::from_score(84), RiskBand::Yellow);
        assert_eq!(RiskBand::from_score(50), RiskBand::Yellow);
        assert_eq!(RiskBand::from_score(49), RiskBand::Red);
        assert_eq!(RiskBand::from_score(0), RiskBand::Red);
    }

    #[test]
    fn test_severity_weighted_deductions() {
        let rules = [
            RuleResult::failed("RULE_001")
                .with_severity(Severity::High)
                .with_description("Benford's Law Analysis"),
            RuleResult::failed("RULE_003").with_severity(Severity::Medium),
            RuleResult::passed("RULE_004").with_severity(Severity::High),
        ];
        let score = compliance_score(&rules);

        assert_eq!(score.final_score, 55);
        assert_eq!(score.risk_band, RiskBand::Yellow);
        assert_eq!(score.breakdown.len(), 2);
        assert_eq!(
            score.breakdown[0],
            "Rule RULE_001 (HIGH) failed: -30 points. Benford's Law Analysis"
        );
    }

    #[test]
    fn test_score_clamps_and_goes_red() {
        let rules: Vec<RuleResult> = (0..5)
            .map(|i| RuleResult::failed(format!("R{i}")).with_severity(Severity::High))
            .collect();
        let score = compliance_score(&rules);
        assert_eq!(score.final_score, 0);
        assert_eq!(score.risk_band.risk_level(), RiskLevel::new(2));
    }

    #[test]
    fn test_unrated_failure_costs_nothing() {
        let score = compliance_score(&[RuleResult::failed("CUSTOM")]);
        assert_eq!(score.final_score, 100);
        assert!(score.breakdown[0].contains("UNRATED"));
    }
}
