//! Append-only scan ledger with a last-scan cache
//!
//! The cache holds the most recently written record so a live view can be
//! built on top of it later. It is only written by [`ScanLedger::record_scan`],
//! under the same lock as the durable append, so the two always agree.

use checkpoint_common::{Error, Identifier, Result, ScanRecord};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::storage::ScanRepository;

/// Default number of records returned by the recent-scans listing
pub const DEFAULT_RECENT_LIMIT: u32 = 10;

struct LedgerInner {
    repo: Arc<dyn ScanRepository>,
    last: Mutex<Option<ScanRecord>>,
}

impl LedgerInner {
    async fn append(&self, uid: Identifier, ok: bool) -> Result<ScanRecord> {
        let mut last = self.last.lock().await;

        let record = ScanRecord::new(uid, ok);
        self.repo.append(&record).await?;
        *last = Some(record.clone());

        Ok(record)
    }
}

/// Scan history shared by all request handlers
#[derive(Clone)]
pub struct ScanLedger {
    inner: Arc<LedgerInner>,
}

impl ScanLedger {
    pub fn new(repo: Arc<dyn ScanRepository>) -> Self {
        Self {
            inner: Arc::new(LedgerInner {
                repo,
                last: Mutex::new(None),
            }),
        }
    }

    /// Timestamp and append a scan, then update the last-scan cache
    ///
    /// Concurrent calls are serialized. If the append fails the cache keeps
    /// its previous value.
    pub async fn record_scan(&self, uid: Identifier, ok: bool) -> Result<ScanRecord> {
        let inner = Arc::clone(&self.inner);

        // Detached so a dropped request cannot split the append from the cache update
        let record = tokio::spawn(async move { inner.append(uid, ok).await })
            .await
            .map_err(|e| Error::Storage(format!("Scan append task failed: {}", e)))??;

        info!("Recorded scan: uid={} ok={}", record.uid, record.ok);
        Ok(record)
    }

    /// Up to `limit` most recent records, newest first
    pub async fn recent_scans(&self, limit: u32) -> Result<Vec<ScanRecord>> {
        self.inner.repo.recent(limit).await
    }

    /// Snapshot of the most recently recorded scan, if any
    pub async fn last_scan(&self) -> Option<ScanRecord> {
        self.inner.last.lock().await.clone()
    }

    /// Total number of recorded scans
    pub async fn len(&self) -> Result<usize> {
        self.inner.repo.count_scans().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, SqliteStore};
    use async_trait::async_trait;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_record_scan_updates_cache() {
        let ledger = ScanLedger::new(Arc::new(MemoryStore::new()));
        assert!(ledger.last_scan().await.is_none());

        let record = ledger
            .record_scan(Identifier::normalize("AB12CD34EF"), true)
            .await
            .unwrap();

        assert_eq!(ledger.last_scan().await, Some(record.clone()));
        assert_eq!(ledger.recent_scans(10).await.unwrap(), vec![record]);
    }

    #[tokio::test]
    async fn test_records_junk_identifiers() {
        let ledger = ScanLedger::new(Arc::new(MemoryStore::new()));

        ledger.record_scan(Identifier::normalize(""), false).await.unwrap();
        ledger.record_scan(Identifier::normalize("zz"), false).await.unwrap();

        assert_eq!(ledger.len().await.unwrap(), 2);
        let recent = ledger.recent_scans(10).await.unwrap();
        assert_eq!(recent[0].uid.as_str(), "ZZ");
        assert_eq!(recent[1].uid.as_str(), "");
    }

    #[tokio::test]
    async fn test_recent_scans_limit() {
        let ledger = ScanLedger::new(Arc::new(MemoryStore::new()));
        for _ in 0..15 {
            ledger.record_scan(Identifier::normalize("x"), false).await.unwrap();
        }

        assert!(ledger.recent_scans(0).await.unwrap().is_empty());
        assert_eq!(
            ledger.recent_scans(DEFAULT_RECENT_LIMIT).await.unwrap().len(),
            10
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_scans_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("db.sqlite3")).await.unwrap();
        let ledger = ScanLedger::new(Arc::new(store));

        let n = 32;
        let mut handles = Vec::new();
        for i in 0..n {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger
                    .record_scan(Identifier::normalize(&format!("{:010X}", i)), i % 2 == 0)
                    .await
                    .unwrap()
            }));
        }

        let mut written = Vec::new();
        for handle in handles {
            written.push(handle.await.unwrap());
        }

        assert_eq!(ledger.len().await.unwrap(), n);

        // Every scan persisted exactly once
        let persisted = ledger.recent_scans(n as u32).await.unwrap();
        let uids: HashSet<_> = persisted.iter().map(|r| r.uid.clone()).collect();
        assert_eq!(uids.len(), n);

        // Cache holds the last persisted record, not a hybrid
        let last = ledger.last_scan().await.unwrap();
        assert!(written.contains(&last));
        let max_ts = persisted.iter().map(|r| r.ts).max().unwrap();
        assert_eq!(last.ts, max_ts);
        assert_eq!(persisted[0], last);
    }

    struct FailingRepository;

    #[async_trait]
    impl ScanRepository for FailingRepository {
        async fn append(&self, _record: &ScanRecord) -> Result<()> {
            Err(Error::Storage("disk full".to_string()))
        }

        async fn recent(&self, _limit: u32) -> Result<Vec<ScanRecord>> {
            Ok(Vec::new())
        }

        async fn count_scans(&self) -> Result<usize> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_failed_append_leaves_cache_untouched() {
        let ledger = ScanLedger::new(Arc::new(FailingRepository));

        let result = ledger.record_scan(Identifier::normalize("AB12CD34EF"), true).await;

        assert!(matches!(result, Err(Error::Storage(_))));
        assert!(ledger.last_scan().await.is_none());
    }
}
