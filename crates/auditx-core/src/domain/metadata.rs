//! Dataset metadata consumed by the Completeness factor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-column statistics. Only the null percentage is read by scoring;
/// other evaluator fields (min, max, type, ...) are ignored on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Share of null cells in the column, in percent (0.0..=100.0)
    #[serde(default)]
    pub null_percentage: f64,
}

impl ColumnStats {
    pub fn with_nulls(null_percentage: f64) -> Self {
        Self { null_percentage }
    }
}

/// Read-only summary of an uploaded dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataSummary {
    /// Keyed by column name; ordered so iteration is deterministic
    #[serde(default)]
    pub column_stats: BTreeMap<String, ColumnStats>,
}

impl MetadataSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, name: impl Into<String>, stats: ColumnStats) -> Self {
        self.column_stats.insert(name.into(), stats);
        self
    }
}
