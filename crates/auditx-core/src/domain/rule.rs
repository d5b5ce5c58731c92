//! Externally evaluated rule outcomes.
//!
//! The core never computes these; it only consumes them. `rule_id` is an
//! opaque discriminator and is never parsed.

use serde::{Deserialize, Serialize};

/// Statistical leading-digit distribution check.
pub const RULE_DIGIT_DISTRIBUTION: &str = "RULE_001";
/// Future-dated entries.
pub const RULE_FUTURE_DATES: &str = "RULE_002";
/// Negative amounts.
pub const RULE_NEGATIVE_AMOUNTS: &str = "RULE_003";
/// Suspicious entity match.
pub const RULE_SUSPICIOUS_ENTITIES: &str = "RULE_004";
/// Column completeness (evaluated upstream, not used by quality scoring).
pub const RULE_COMPLETENESS: &str = "RULE_005";
/// PII exposure.
pub const RULE_PII_EXPOSURE: &str = "RULE_006";

/// Severity attached to a rule by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Pass/fail outcome of one compliance or statistical check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResult {
    pub rule_id: String,
    pub passed: bool,
    /// Evaluator-specific evidence, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RuleResult {
    pub fn passed(rule_id: impl Into<String>) -> Self {
        Self::new(rule_id, true)
    }

    pub fn failed(rule_id: impl Into<String>) -> Self {
        Self::new(rule_id, false)
    }

    fn new(rule_id: impl Into<String>, passed: bool) -> Self {
        Self {
            rule_id: rule_id.into(),
            passed,
            details: None,
            severity: None,
            description: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_evaluator_output() {
        let json = r#"{
            "rule_id": "RULE_001",
            "framework": "AuditX_Core",
            "severity": "HIGH",
            "description": "Benford's Law Analysis",
            "passed": false,
            "details": {"failed_columns": {"amount": "Non-conforming"}}
        }"#;
        let rule: RuleResult = serde_json::from_str(json).unwrap();
        assert_eq!(rule.rule_id, RULE_DIGIT_DISTRIBUTION);
        assert!(!rule.passed);
        assert_eq!(rule.severity, Some(Severity::High));
        assert!(rule.details.is_some());
    }

    #[test]
    fn minimal_rule_parses() {
        let rule: RuleResult = serde_json::from_str(r#"{"rule_id":"X","passed":true}"#).unwrap();
        assert_eq!(rule, RuleResult::passed("X"));
    }

    #[test]
    fn unknown_severity_is_rejected() {
        let result: Result<RuleResult, _> =
            serde_json::from_str(r#"{"rule_id":"X","passed":true,"severity":"CRITICAL"}"#);
        assert!(result.is_err());
    }
}
