//! Record Store for pagetrack.
//!
//! A persistent table of [`PageRecord`]s keyed by URL. Every operation is
//! async: the SQLite call runs on the blocking pool while the caller awaits.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, error};

use crate::database::connection::Database;
use crate::types::errors::StoreError;
use crate::types::record::{PageRecord, PageStatus};

/// Trait defining record store operations.
#[allow(async_fn_in_trait)]
pub trait RecordStoreTrait {
    async fn get(&self, url: &str) -> Result<Option<PageRecord>, StoreError>;
    async fn upsert(&self, record: &PageRecord) -> Result<(), StoreError>;
    async fn insert_if_absent(&self, record: &PageRecord) -> Result<bool, StoreError>;
    async fn get_all(&self) -> Result<Vec<PageRecord>, StoreError>;
    async fn count(&self) -> Result<usize, StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

const COLUMNS: &str = "url, identifier, status, \
     first_open_time, last_open_time, first_ignore_time, last_ignore_time, \
     first_view_time, last_view_time, first_analyze_time, last_analyze_time, \
     first_solve_time, last_solve_time";

/// Record store backed by one SQLite connection.
///
/// Cloning yields another handle to the same connection.
#[derive(Clone)]
pub struct RecordStore {
    db: Arc<Mutex<Database>>,
}

impl RecordStore {
    /// Opens (or creates) the store at `path`. Idempotent; creates the schema if absent.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        debug!(path = %path.display(), "opening record store");
        let opened = tokio::task::spawn_blocking(move || Database::open(&path))
            .await
            .map_err(|e| StoreError::Join(e.to_string()))?;
        Self::from_opened(opened)
    }

    /// Opens a store backed by an in-memory database.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let opened = tokio::task::spawn_blocking(Database::open_in_memory)
            .await
            .map_err(|e| StoreError::Join(e.to_string()))?;
        Self::from_opened(opened)
    }

    fn from_opened(opened: Result<Database, rusqlite::Error>) -> Result<Self, StoreError> {
        let db = opened.map_err(|e| {
            error!(error = %e, "failed to open record store");
            StoreError::Open(e.to_string())
        })?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    /// Runs `f` against the connection on the blocking pool.
    ///
    /// A poisoned lock is recovered; the connection stays usable.
    async fn call<F, R>(&self, op: &'static str, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let result = tokio::task::spawn_blocking(move || {
            let guard = db.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            f(guard.connection())
        })
        .await
        .map_err(|e| {
            error!(op, error = %e, "record store task failed");
            StoreError::Join(e.to_string())
        })?;

        result.map_err(|e| {
            error!(op, error = %e, "record store operation failed");
            StoreError::op(op, e)
        })
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<PageRecord> {
        let status: Option<String> = row.get(2)?;
        let status = match status {
            Some(s) => Some(s.parse::<PageStatus>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
            })?),
            None => None,
        };
        Ok(PageRecord {
            url: row.get(0)?,
            identifier: row.get(1)?,
            status,
            first_open_time: row.get(3)?,
            last_open_time: row.get(4)?,
            first_ignore_time: row.get(5)?,
            last_ignore_time: row.get(6)?,
            first_view_time: row.get(7)?,
            last_view_time: row.get(8)?,
            first_analyze_time: row.get(9)?,
            last_analyze_time: row.get(10)?,
            first_solve_time: row.get(11)?,
            last_solve_time: row.get(12)?,
        })
    }

    fn write(conn: &Connection, verb: &str, r: &PageRecord) -> rusqlite::Result<usize> {
        let sql = format!(
            "{} INTO urls ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            verb, COLUMNS
        );
        conn.execute(
            &sql,
            params![
                r.url,
                r.identifier,
                r.status.map(|s| s.as_str()),
                r.first_open_time,
                r.last_open_time,
                r.first_ignore_time,
                r.last_ignore_time,
                r.first_view_time,
                r.last_view_time,
                r.first_analyze_time,
                r.last_analyze_time,
                r.first_solve_time,
                r.last_solve_time,
            ],
        )
    }
}

impl RecordStoreTrait for RecordStore {
    /// Point lookup by URL.
    async fn get(&self, url: &str) -> Result<Option<PageRecord>, StoreError> {
        debug!(url, "store get");
        let url = url.to_string();
        self.call("get", move |conn| {
            conn.query_row(
                &format!("SELECT {} FROM urls WHERE url = ?1", COLUMNS),
                params![url],
                Self::row_to_record,
            )
            .optional()
        })
        .await
    }

    /// Inserts the record, or overwrites the existing record with the same URL.
    async fn upsert(&self, record: &PageRecord) -> Result<(), StoreError> {
        debug!(url = %record.url, "store upsert");
        let record = record.clone();
        self.call("put", move |conn| Self::write(conn, "INSERT OR REPLACE", &record).map(|_| ()))
            .await
    }

    /// Inserts the record only if its URL is unknown. Returns whether a row was written.
    async fn insert_if_absent(&self, record: &PageRecord) -> Result<bool, StoreError> {
        debug!(url = %record.url, "store insert if absent");
        let record = record.clone();
        self.call("add", move |conn| {
            Self::write(conn, "INSERT OR IGNORE", &record).map(|affected| affected > 0)
        })
        .await
    }

    /// All records. Callers must not rely on the order.
    async fn get_all(&self) -> Result<Vec<PageRecord>, StoreError> {
        self.call("get_all", |conn| {
            let mut stmt = conn.prepare(&format!("SELECT {} FROM urls ORDER BY url", COLUMNS))?;
            let records = stmt
                .query_map([], Self::row_to_record)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
        .await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.call("count", |conn| {
            conn.query_row("SELECT COUNT(*) FROM urls", [], |row| row.get::<_, i64>(0))
                .map(|n| n as usize)
        })
        .await
    }

    /// Removes every record.
    async fn clear(&self) -> Result<(), StoreError> {
        self.call("clear", |conn| conn.execute("DELETE FROM urls", []).map(|_| ()))
            .await
    }
}
