//! In-memory storage implementation for testing.

use std::collections::BTreeSet;

use async_trait::async_trait;
use checkpoint_common::{Identifier, Result, ScanRecord};
use tokio::sync::RwLock;

use super::{AllowlistRepository, ScanRepository};

/// In-memory implementation of both repositories.
///
/// Mirrors [`super::SqliteStore`] ordering: newest timestamp first, ties
/// broken by reverse insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    allowed: RwLock<BTreeSet<Identifier>>,
    /// Scans in insertion order.
    scans: RwLock<Vec<ScanRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AllowlistRepository for MemoryStore {
    async fn insert(&self, uid: &Identifier) -> Result<bool> {
        Ok(self.allowed.write().await.insert(uid.clone()))
    }

    async fn contains(&self, uid: &Identifier) -> Result<bool> {
        Ok(self.allowed.read().await.contains(uid))
    }

    async fn count_allowed(&self) -> Result<usize> {
        Ok(self.allowed.read().await.len())
    }
}

#[async_trait]
impl ScanRepository for MemoryStore {
    async fn append(&self, record: &ScanRecord) -> Result<()> {
        self.scans.write().await.push(record.clone());
        Ok(())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<ScanRecord>> {
        let scans = self.scans.read().await;

        // Stable sort over the reversed log keeps same-second scans newest first
        let mut records: Vec<ScanRecord> = scans.iter().rev().cloned().collect();
        records.sort_by(|a, b| b.ts.cmp(&a.ts));
        records.truncate(limit as usize);

        Ok(records)
    }

    async fn count_scans(&self) -> Result<usize> {
        Ok(self.scans.read().await.len())
    }
}
