//! Persistence backends for the allowlist and the scan ledger
//!
//! Each entity gets its own repository trait so the request layer never
//! touches SQL directly. [`SqliteStore`] is the durable backend used by the
//! service; [`MemoryStore`] has the same observable behaviour and backs tests.

mod memory;
mod sqlite;

use async_trait::async_trait;
use checkpoint_common::{Identifier, Result, ScanRecord};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Durable set of allowlisted identifiers
#[async_trait]
pub trait AllowlistRepository: Send + Sync + 'static {
    /// Insert an identifier.
    /// Returns Ok(true) if added, Ok(false) if it was already present
    async fn insert(&self, uid: &Identifier) -> Result<bool>;

    /// Check whether an identifier is present
    async fn contains(&self, uid: &Identifier) -> Result<bool>;

    /// Number of allowlisted identifiers
    async fn count_allowed(&self) -> Result<usize>;
}

/// Append-only scan history
#[async_trait]
pub trait ScanRepository: Send + Sync + 'static {
    /// Append a record to the history
    async fn append(&self, record: &ScanRecord) -> Result<()>;

    /// Up to `limit` records, newest first.
    /// Records from the same second come back in reverse insertion order.
    async fn recent(&self, limit: u32) -> Result<Vec<ScanRecord>>;

    /// Total number of recorded scans
    async fn count_scans(&self) -> Result<usize>;
}
