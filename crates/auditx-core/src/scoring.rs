//! Data-quality scoring engine.
//!
//! Maps [`RuleResult`] vectors plus a [`MetadataSummary`] to the seven
//! [`QualityFactor`] scores. Every factor starts at 100, loses fixed points
//! per failed rule (looked up in a [`Deduction`] table) and is clamped to
//! `0..=100`. Completeness additionally loses points per column whose null
//! percentage is strictly above the threshold.
//!
//! A rule missing from the input is treated exactly like a passed rule.
//! Consistency has no contributing rule and stays at 100.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::error::{AuditError, Result};
use crate::domain::factor::{FactorName, FactorScores, QualityFactor};
use crate::domain::metadata::MetadataSummary;
use crate::domain::rule::{
    RuleResult, RULE_DIGIT_DISTRIBUTION, RULE_FUTURE_DATES, RULE_NEGATIVE_AMOUNTS,
    RULE_PII_EXPOSURE, RULE_SUSPICIOUS_ENTITIES,
};

/// Starting score for every factor.
pub const MAX_SCORE: u32 = 100;

/// A column counts against Completeness when its null share is above this (percent).
pub const NULL_PERCENTAGE_THRESHOLD: f64 = 10.0;

/// Completeness points lost per high-null column.
pub const HIGH_NULL_COLUMN_PENALTY: u32 = 15;

// ---------------------------------------------------------------------------
// Deduction table
// ---------------------------------------------------------------------------

/// Points a failed rule removes from one factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Deduction {
    pub rule_id: &'static str,
    pub factor: FactorName,
    pub points: u32,
}

const fn deduct(rule_id: &'static str, factor: FactorName, points: u32) -> Deduction {
    Deduction {
        rule_id,
        factor,
        points,
    }
}

/// Standard rule-to-factor mapping. One rule may feed several factors and
/// one factor may be fed by several rules; deductions add up before clamping.
pub const STANDARD_DEDUCTIONS: &[Deduction] = &[
    deduct(RULE_FUTURE_DATES, FactorName::Validity, 25),
    deduct(RULE_DIGIT_DISTRIBUTION, FactorName::Accuracy, 40),
    deduct(RULE_FUTURE_DATES, FactorName::Timeliness, 30),
    deduct(RULE_DIGIT_DISTRIBUTION, FactorName::Integrity, 25),
    deduct(RULE_NEGATIVE_AMOUNTS, FactorName::Integrity, 25),
    deduct(RULE_PII_EXPOSURE, FactorName::Security, 40),
    deduct(RULE_SUSPICIOUS_ENTITIES, FactorName::Security, 40),
];

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Stateless scorer parameterised by its deduction table.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    deductions: &'static [Deduction],
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScoringEngine {
    /// Engine using [`STANDARD_DEDUCTIONS`].
    pub fn standard() -> Self {
        Self::with_deductions(STANDARD_DEDUCTIONS)
    }

    pub fn with_deductions(deductions: &'static [Deduction]) -> Self {
        Self { deductions }
    }

    pub fn deductions(&self) -> &'static [Deduction] {
        self.deductions
    }

    /// Score a dataset. Fails with `InvalidInput` before computing anything
    /// if a rule or column statistic is malformed.
    pub fn score(&self, rules: &[RuleResult], metadata: &MetadataSummary) -> Result<FactorScores> {
        let outcomes = rule_outcomes(rules)?;
        validate_metadata(metadata)?;

        let mut lost = [0u32; FactorName::COUNT];

        let high_null_columns = metadata
            .column_stats
            .values()
            .filter(|stats| stats.null_percentage > NULL_PERCENTAGE_THRESHOLD)
            .count() as u32;
        lost[FactorName::Completeness.index()] =
            high_null_columns.saturating_mul(HIGH_NULL_COLUMN_PENALTY);

        for deduction in self.deductions {
            if outcomes.get(deduction.rule_id) == Some(&false) {
                lost[deduction.factor.index()] += deduction.points;
            }
        }

        Ok(FactorName::ALL.map(|name| QualityFactor {
            name,
            score: MAX_SCORE.saturating_sub(lost[name.index()]) as u8,
        }))
    }
}

/// Score with the standard deduction table.
pub fn score(rules: &[RuleResult], metadata: &MetadataSummary) -> Result<FactorScores> {
    ScoringEngine::standard().score(rules, metadata)
}

/// Collapse the rule list into `rule_id -> passed`.
///
/// Repeated IDs must agree; a conflicting repeat would make the outcome
/// depend on input order.
fn rule_outcomes(rules: &[RuleResult]) -> Result<BTreeMap<&str, bool>> {
    let mut outcomes = BTreeMap::new();
    for rule in rules {
        if rule.rule_id.trim().is_empty() {
            return Err(AuditError::InvalidInput(
                "rule result with empty rule_id".to_string(),
            ));
        }
        if let Some(previous) = outcomes.insert(rule.rule_id.as_str(), rule.passed) {
            if previous != rule.passed {
                return Err(AuditError::InvalidInput(format!(
                    "conflicting results for {}",
                    rule.rule_id
                )));
            }
        }
    }
    Ok(outcomes)
}

fn validate_metadata(metadata: &MetadataSummary) -> Result<()> {
    for (column, stats) in &metadata.column_stats {
        let pct = stats.null_percentage;
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return Err(AuditError::InvalidInput(format!(
                "column {column}: null_percentage {pct} outside 0..=100"
            )));
        }
    }
    Ok(())
}
