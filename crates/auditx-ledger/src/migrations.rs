//! SurrealDB schema migrations and initialization
//!
//! Sets up the ledger table with the constraints that make it write-once.

use crate::Result;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info};

/// Initialize all AuditX tables in SurrealDB
///
/// Safe to call multiple times (idempotent).
pub async fn init_schema(db: &Surreal<Any>) -> Result<()> {
    info!("Initializing AuditX SurrealDB schema");

    init_audit_records_table(db).await?;

    info!("AuditX schema initialization complete");
    Ok(())
}

/// Initialize `audit_records` table with constraints and indexes
///
/// Schema:
/// ```text
/// TABLE audit_records {
///   content_hash:  STRING (unique, 64 hex chars)
///   risk_level:    INT (>= 0)
///   submitter:     STRING
///   recorded_at:   DATETIME
/// }
/// ```
///
/// Constraints:
/// - `content_hash` is unique; a second CREATE for the same hash fails
///   atomically inside the database, which is the ledger's check-and-create
/// - rows can never be updated or deleted
async fn init_audit_records_table(db: &Surreal<Any>) -> Result<()> {
    debug!("Initializing audit_records table");

    let sql = r#"
        DEFINE TABLE IF NOT EXISTS audit_records SCHEMALESS
            PERMISSIONS
                FOR select FULL,
                FOR create FULL,
                FOR update NONE,
                FOR delete NONE;

        DEFINE FIELD IF NOT EXISTS content_hash ON TABLE audit_records TYPE string
            ASSERT string::len($value) = 64;
        DEFINE FIELD IF NOT EXISTS risk_level ON TABLE audit_records TYPE int
            ASSERT $value >= 0;
        DEFINE FIELD IF NOT EXISTS submitter ON TABLE audit_records TYPE string;
        DEFINE FIELD IF NOT EXISTS recorded_at ON TABLE audit_records TYPE datetime;

        -- One record per content hash
        DEFINE INDEX IF NOT EXISTS idx_content_hash ON TABLE audit_records COLUMNS content_hash UNIQUE;
    "#;

    db.query(sql).await?.check()?;
    info!("✓ audit_records table initialized");
    Ok(())
}
