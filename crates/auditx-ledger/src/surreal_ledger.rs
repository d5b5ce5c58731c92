//! SurrealDB-backed AuditLedger implementation
//!
//! Uses `schema::AuditRecordRow` for persistence, converting to/from
//! `storage_traits` types at the boundary. The UNIQUE index on
//! `content_hash` is the atomic check-and-create: a losing CREATE fails inside
//! the database and the loser reads back the winner's row.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::{Database, Root};
use surrealdb::Surreal;
use tracing::{debug, info, instrument, warn};

use crate::config::LedgerConfig;
use crate::error::{StateError, StorageError};
use crate::migrations;
use crate::schema::AuditRecordRow;
use crate::storage_traits::{
    AuditLedger, AuditRecord, ContentHash, Receipt, RiskLevel, StorageResult, Submitter,
};

/// How many times `record` re-attempts a CREATE that failed without leaving
/// a row behind (e.g. a transaction conflict with a writer that also aborted).
const CREATE_ATTEMPTS: usize = 3;

/// SurrealDB-backed implementation of [`AuditLedger`].
#[derive(Clone)]
pub struct SurrealAuditLedger {
    db: Surreal<Any>,
    timeout: Duration,
}

impl SurrealAuditLedger {
    /// Create an in-memory instance for testing.
    ///
    /// Connects to `mem://`, selects `auditx/ledger`, and runs `init_schema`.
    pub async fn in_memory() -> crate::Result<Self> {
        Self::connect(LedgerConfig::in_memory()).await
    }

    /// Create from environment variables (see [`LedgerConfig::from_env`]).
    pub async fn from_env() -> crate::Result<Self> {
        let config = LedgerConfig::from_env().map_err(StateError::Connection)?;
        Self::connect(config).await
    }

    /// Connect, authenticate if configured, and initialise the schema.
    #[instrument(skip(config), fields(endpoint = %config.endpoint, namespace = %config.namespace, database = %config.database))]
    pub async fn connect(config: LedgerConfig) -> crate::Result<Self> {
        if let Some(path) = config.local_path() {
            std::fs::create_dir_all(path).map_err(|e| {
                StateError::Connection(format!(
                    "Failed to create database directory {}: {}",
                    path, e
                ))
            })?;
        }

        let limit = config.timeout;
        let db = within(limit, "connect", surrealdb::engine::any::connect(config.endpoint.as_str()))
            .await?
            .map_err(|e| {
                StateError::Connection(format!("Failed to connect to {}: {}", config.endpoint, e))
            })?;

        if let Some(creds) = &config.credentials {
            let signed_in = if creds.is_root {
                within(
                    limit,
                    "signin",
                    db.signin(Root {
                        username: &creds.username,
                        password: &creds.password,
                    }),
                )
                .await?
                .map(|_| ())
            } else {
                within(
                    limit,
                    "signin",
                    db.signin(Database {
                        namespace: &config.namespace,
                        database: &config.database,
                        username: &creds.username,
                        password: &creds.password,
                    }),
                )
                .await?
                .map(|_| ())
            };
            signed_in.map_err(|e| StateError::Connection(format!("Auth failed: {e}")))?;
        }

        within(
            limit,
            "use_ns",
            db.use_ns(&config.namespace).use_db(&config.database),
        )
        .await?
        .map_err(|e| StateError::Connection(e.to_string()))?;

        within(limit, "schema setup", migrations::init_schema(&db))
            .await?
            .map_err(|e| StateError::SchemaSetup(e.to_string()))?;

        info!("SurrealAuditLedger connected ({})", config.endpoint);
        Ok(Self {
            db,
            timeout: config.timeout,
        })
    }

    // -- private helpers -----------------------------------------------------

    /// Run one backend round-trip under the configured timeout.
    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> StorageResult<T>
    where
        F: Future<Output = std::result::Result<T, surrealdb::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(|e| classify(op, e)),
            Err(_) => Err(StorageError::unavailable(format!(
                "{op} timed out after {:?}",
                self.timeout
            ))),
        }
    }

    async fn fetch_row(&self, hash: &ContentHash) -> StorageResult<Option<AuditRecordRow>> {
        let hex = hash.to_hex();
        let rows: Vec<AuditRecordRow> = self
            .bounded("lookup", async {
                let mut res = self
                    .db
                    .query("SELECT * FROM audit_records WHERE content_hash = $hash LIMIT 1")
                    .bind(("hash", hex))
                    .await?;
                res.take(0)
            })
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn try_create(&self, row: AuditRecordRow) -> StorageResult<Option<AuditRecordRow>> {
        self.bounded("record", async {
            let created: Option<AuditRecordRow> =
                self.db.create("audit_records").content(row).await?;
            Ok(created)
        })
        .await
    }
}

/// Bound one connection step by `limit`.
async fn within<T, F>(limit: Duration, step: &str, fut: F) -> crate::Result<T>
where
    F: std::future::IntoFuture<Output = T>,
{
    tokio::time::timeout(limit, fut.into_future())
        .await
        .map_err(|_| StateError::Connection(format!("{step} timed out after {limit:?}")))
}

/// Map an SDK error onto the ledger taxonomy.
///
/// The engine rejecting a statement (locally as `Db`, remotely as
/// `Api::Query`) or returning an undecodable row is `Backend`; anything
/// else means the store could not be reached and is `Unavailable`.
fn classify(op: &str, err: surrealdb::Error) -> StorageError {
    use surrealdb::error::Api;

    match err {
        surrealdb::Error::Db(e) => StorageError::Backend(format!("{op}: {e}")),
        surrealdb::Error::Api(e @ (Api::Query(_) | Api::FromValue { .. })) => {
            StorageError::Backend(format!("{op}: {e}"))
        }
        other => StorageError::unavailable(format!("{op}: {other}")),
    }
}

#[async_trait]
impl AuditLedger for SurrealAuditLedger {
    async fn record(
        &self,
        hash: &ContentHash,
        risk_level: RiskLevel,
        submitter: &Submitter,
    ) -> StorageResult<Receipt> {
        debug!(content_hash = %hash.short(), risk_level = %risk_level, "recording audit");

        let mut last_err = None;
        for attempt in 1..=CREATE_ATTEMPTS {
            let row = AuditRecordRow::new(hash, risk_level, submitter);
            let fallback = row.clone();
            match self.try_create(row).await {
                Ok(created) => {
                    let record = created.unwrap_or(fallback).into_record()?;
                    return Ok(Receipt::Created(record));
                }
                // The engine rejected the CREATE; the usual cause is the
                // UNIQUE index, in which case the winner's row is readable.
                Err(StorageError::Backend(reason)) => {
                    if let Some(existing) = self.fetch_row(hash).await? {
                        debug!(content_hash = %hash.short(), "hash already anchored");
                        return Ok(Receipt::Duplicate(existing.into_record()?));
                    }
                    warn!(attempt, %reason, "create rejected without an existing row");
                    last_err = Some(StorageError::Backend(reason));
                }
                Err(other) => return Err(other),
            }
        }

        Err(last_err.unwrap_or_else(|| StorageError::Backend("record failed".to_string())))
    }

    async fn lookup(&self, hash: &ContentHash) -> StorageResult<Option<AuditRecord>> {
        self.fetch_row(hash)
            .await?
            .map(AuditRecordRow::into_record)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::error::{Api, Db};

    #[test]
    fn test_remote_query_rejection_is_backend() {
        let err = surrealdb::Error::Api(Api::Query(
            "Database index `idx_content_hash` already contains".to_string(),
        ));
        let mapped = classify("record", err);
        assert!(matches!(mapped, StorageError::Backend(_)));
        assert!(!mapped.is_unavailable());
    }

    #[test]
    fn test_local_engine_error_is_backend() {
        let mapped = classify("record", surrealdb::Error::Db(Db::Thrown("boom".to_string())));
        assert!(matches!(mapped, StorageError::Backend(_)));
    }

    #[test]
    fn test_lost_connection_is_unavailable() {
        let mapped = classify("lookup", surrealdb::Error::Api(Api::ConnectionUninitialised));
        assert!(mapped.is_unavailable());
    }

    #[tokio::test]
    async fn test_stalled_round_trip_is_unavailable() {
        let config = LedgerConfig::in_memory().with_timeout(Duration::from_millis(50));
        let ledger = SurrealAuditLedger::connect(config).await.unwrap();

        let stalled = std::future::pending::<std::result::Result<(), surrealdb::Error>>();
        let err = ledger.bounded("lookup", stalled).await.unwrap_err();
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_stalled_connect_step_is_connection_error() {
        let limit = Duration::from_millis(20);
        let err = within(limit, "signin", std::future::pending::<()>())
            .await
            .unwrap_err();
        assert!(matches!(err, StateError::Connection(_)));
    }
}
