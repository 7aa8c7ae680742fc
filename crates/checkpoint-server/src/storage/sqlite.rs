//! SQLite storage for the allowlist and scan ledger
//!
//! Tables:
//! - allowed(uid TEXT PRIMARY KEY)
//! - scans(ts INTEGER, uid TEXT, ok INTEGER) with ok stored as 0/1
//!
//! Every operation opens its own connection on the blocking pool. WAL mode
//! lets readers run while a scan is being written.

use async_trait::async_trait;
use checkpoint_common::{Error, Identifier, Result, ScanRecord};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use super::{AllowlistRepository, ScanRepository};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS allowed(uid TEXT PRIMARY KEY);
    CREATE TABLE IF NOT EXISTS scans(ts INTEGER, uid TEXT, ok INTEGER);
";

/// SQLite-backed store for both tables
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) the database file and ensure the schema exists
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let store = Self { path };
        store
            .with_connection(|conn| conn.execute_batch(SCHEMA))
            .await?;

        info!("SQLite store ready at {}", store.path.display());
        Ok(store)
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(path: &Path) -> rusqlite::Result<Connection> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_millis(1_000))?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
        Ok(conn)
    }

    /// Run `op` against a fresh connection on the blocking thread pool
    async fn with_connection<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || {
            let conn = Self::connect(&path)?;
            op(&conn)
        })
        .await
        .map_err(|e| Error::Storage(format!("SQLite task failed: {}", e)))?
        .map_err(|e| Error::Storage(e.to_string()))
    }
}

fn scan_from_row(row: &Row<'_>) -> rusqlite::Result<ScanRecord> {
    Ok(ScanRecord::at(
        row.get(0)?,
        Identifier::from_persisted(row.get(1)?),
        row.get(2)?,
    ))
}

#[async_trait]
impl AllowlistRepository for SqliteStore {
    async fn insert(&self, uid: &Identifier) -> Result<bool> {
        let uid = uid.as_str().to_owned();

        let changed = self
            .with_connection(move |conn| {
                conn.execute("INSERT OR IGNORE INTO allowed(uid) VALUES(?1)", params![uid])
            })
            .await?;

        Ok(changed > 0)
    }

    async fn contains(&self, uid: &Identifier) -> Result<bool> {
        let uid = uid.as_str().to_owned();

        self.with_connection(move |conn| {
            conn.query_row("SELECT 1 FROM allowed WHERE uid = ?1", params![uid], |_| Ok(()))
                .optional()
                .map(|row| row.is_some())
        })
        .await
    }

    async fn count_allowed(&self) -> Result<usize> {
        self.with_connection(|conn| {
            conn.query_row("SELECT COUNT(*) FROM allowed", [], |row| row.get(0))
        })
        .await
    }
}

#[async_trait]
impl ScanRepository for SqliteStore {
    async fn append(&self, record: &ScanRecord) -> Result<()> {
        let ScanRecord { ts, uid, ok } = record.clone();

        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO scans(ts, uid, ok) VALUES(?1, ?2, ?3)",
                params![ts, uid.as_str(), ok],
            )
        })
        .await?;

        debug!("Appended scan: ts={} uid={} ok={}", ts, record.uid, ok);
        Ok(())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<ScanRecord>> {
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT ts, uid, ok FROM scans ORDER BY ts DESC, rowid DESC LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], scan_from_row)?;
            let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
        .await
    }

    async fn count_scans(&self) -> Result<usize> {
        self.with_connection(|conn| {
            conn.query_row("SELECT COUNT(*) FROM scans", [], |row| row.get(0))
        })
        .await
    }
}
