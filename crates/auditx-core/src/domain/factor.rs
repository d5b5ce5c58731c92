//! The seven data-quality dimensions.

use serde::{Deserialize, Serialize};

/// One data-quality dimension. Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FactorName {
    Completeness,
    Validity,
    Accuracy,
    Consistency,
    Timeliness,
    Integrity,
    Security,
}

impl FactorName {
    pub const COUNT: usize = 7;

    /// All factors in report order.
    pub const ALL: [FactorName; FactorName::COUNT] = [
        FactorName::Completeness,
        FactorName::Validity,
        FactorName::Accuracy,
        FactorName::Consistency,
        FactorName::Timeliness,
        FactorName::Integrity,
        FactorName::Security,
    ];

    /// Position in [`FactorName::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FactorName::Completeness => "Completeness",
            FactorName::Validity => "Validity",
            FactorName::Accuracy => "Accuracy",
            FactorName::Consistency => "Consistency",
            FactorName::Timeliness => "Timeliness",
            FactorName::Integrity => "Integrity",
            FactorName::Security => "Security",
        }
    }
}

impl std::fmt::Display for FactorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A normalized 0-100 score for one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityFactor {
    pub name: FactorName,
    pub score: u8,
}

/// Exactly seven factors, one per [`FactorName`], in report order.
pub type FactorScores = [QualityFactor; FactorName::COUNT];
