//! Schema definitions for AuditX SurrealDB tables
//!
//! Tables:
//! - audit_records: one row per distinct content hash

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::storage_traits::{AuditRecord, ContentHash, RiskLevel, Submitter};

/// Module for serializing chrono DateTime to SurrealDB datetime format
mod surreal_datetime {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};
    use surrealdb::sql::Datetime as SurrealDatetime;

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let sd = SurrealDatetime::from(*date);
        serde::Serialize::serialize(&sd, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let sd = SurrealDatetime::deserialize(deserializer)?;
        Ok(DateTime::from(sd))
    }
}

/// Row in the `audit_records` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecordRow {
    /// SurrealDB record ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<surrealdb::sql::Thing>,
    /// Lowercase hex SHA-256 of the dataset (unique)
    pub content_hash: String,
    /// Ordinal risk level
    pub risk_level: u32,
    /// Submitter identity
    pub submitter: String,
    /// Creation time
    #[serde(with = "surreal_datetime")]
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecordRow {
    /// Build a fresh row stamped with the current time (whole seconds).
    pub fn new(hash: &ContentHash, risk_level: RiskLevel, submitter: &Submitter) -> Self {
        let now = Utc::now();
        let recorded_at = DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now);
        AuditRecordRow {
            id: None,
            content_hash: hash.to_hex(),
            risk_level: risk_level.value(),
            submitter: submitter.as_str().to_string(),
            recorded_at,
        }
    }

    /// Convert the stored row into the domain record.
    pub fn into_record(self) -> Result<AuditRecord, StorageError> {
        let content_hash = ContentHash::try_from(self.content_hash)
            .map_err(|e| StorageError::Backend(format!("corrupt audit_records row: {e}")))?;
        Ok(AuditRecord {
            content_hash,
            risk_level: RiskLevel::new(self.risk_level),
            timestamp: self.recorded_at.timestamp(),
            submitter: Submitter::new(self.submitter),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_round_trips_into_record() {
        let hash = ContentHash::from_bytes(b"dataset");
        let row = AuditRecordRow::new(&hash, RiskLevel::new(2), &Submitter::new("bob"));
        let ts = row.recorded_at.timestamp();

        let record = row.into_record().unwrap();
        assert_eq!(record.content_hash, hash);
        assert_eq!(record.risk_level, RiskLevel::new(2));
        assert_eq!(record.submitter.as_str(), "bob");
        assert_eq!(record.timestamp, ts);
    }

    #[test]
    fn corrupt_hash_is_backend_error() {
        let mut row = AuditRecordRow::new(
            &ContentHash::from_bytes(b"x"),
            RiskLevel::new(0),
            &Submitter::anonymous(),
        );
        row.content_hash = "not-a-hash".to_string();
        assert!(matches!(row.into_record(), Err(StorageError::Backend(_))));
    }
}
