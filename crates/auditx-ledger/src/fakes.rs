//! In-memory fakes for storage traits (testing only)
//!
//! Provides `MemoryAuditLedger`, which satisfies the `AuditLedger` contract
//! without any external dependencies and can be switched offline to exercise
//! `StorageError::Unavailable` paths.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::StorageError;
use crate::storage_traits::*;

// ---------------------------------------------------------------------------
// MemoryAuditLedger
// ---------------------------------------------------------------------------

/// In-memory audit ledger backed by a `HashMap<ContentHash, AuditRecord>`.
///
/// The check-and-create in `record` happens under one lock acquisition with
/// no await point inside, so concurrent callers for the same hash see a single
/// winner. The lock is held only for a map probe, so callers for different
/// hashes never wait on each other's I/O.
#[derive(Debug, Default)]
pub struct MemoryAuditLedger {
    records: Mutex<HashMap<ContentHash, AuditRecord>>,
    offline: AtomicBool,
}

impl MemoryAuditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an unreachable backing store.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of anchored records.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_online(&self) -> StorageResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable("in-memory ledger is offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl AuditLedger for MemoryAuditLedger {
    async fn record(
        &self,
        hash: &ContentHash,
        risk_level: RiskLevel,
        submitter: &Submitter,
    ) -> StorageResult<Receipt> {
        self.ensure_online()?;
        let mut records = self.records.lock().unwrap();
        match records.entry(*hash) {
            Entry::Occupied(existing) => Ok(Receipt::Duplicate(existing.get().clone())),
            Entry::Vacant(slot) => {
                let record = AuditRecord {
                    content_hash: *hash,
                    risk_level,
                    timestamp: Utc::now().timestamp(),
                    submitter: submitter.clone(),
                };
                slot.insert(record.clone());
                Ok(Receipt::Created(record))
            }
        }
    }

    async fn lookup(&self, hash: &ContentHash) -> StorageResult<Option<AuditRecord>> {
        self.ensure_online()?;
        let records = self.records.lock().unwrap();
        Ok(records.get(hash).cloned())
    }
}
