//! Schema migrations for the pagetrack SQLite database.
//!
//! A `schema_version` table records which migrations have been applied.
//! The record table is created once at version 1 and never migrated.

use rusqlite::Connection;

/// Current schema version.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Returns the current schema version from the database (0 if none recorded).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Runs all pending schema migrations against the provided connection.
///
/// Safe to call on every startup.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    if get_schema_version(conn) < 1 {
        migration_v1(conn)?;
        record_version(conn, 1, "Initial schema: urls")?;
    }

    Ok(())
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<(), rusqlite::Error> {
    let now = chrono::Utc::now().timestamp();
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![version, now, description],
    )?;
    Ok(())
}

/// V1: the `urls` table, keyed by URL.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS urls (
            url TEXT PRIMARY KEY NOT NULL,
            identifier TEXT,
            status TEXT,
            first_open_time TEXT,
            last_open_time TEXT,
            first_ignore_time TEXT,
            last_ignore_time TEXT,
            first_view_time TEXT,
            last_view_time TEXT,
            first_analyze_time TEXT,
            last_analyze_time TEXT,
            first_solve_time TEXT,
            last_solve_time TEXT
        );
        ",
    )
}
