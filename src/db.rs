// 🗄️ Database bootstrap - SQLite schema for the two record collections
// Sessions and finance entries live in independent tables; the stores in
// sessions.rs / finance.rs are the only writers.

use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::error::Result;

/// Create tables and indexes if they do not exist yet.
pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            salary REAL NOT NULL,
            duration_minutes INTEGER NOT NULL,
            pay REAL NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS finance (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL
        )",
        [],
    )?;

    // Month-scoped queries filter on date
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_sessions_date ON sessions(date)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_finance_kind ON finance(kind)",
        [],
    )?;

    Ok(())
}

/// Open (or create) the database file and apply the schema.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)?;
    setup_database(&conn)?;

    debug!(path = %path.display(), "database opened");

    Ok(conn)
}

/// In-memory database with the same schema, for tests and dry runs.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    setup_database(&conn)?;

    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_is_idempotent() {
        let conn = open_in_memory().unwrap();
        // Re-running must not fail or clobber existing tables
        setup_database(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type = 'table' AND name IN ('sessions', 'finance')",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(tables, 2);
    }

    #[test]
    fn open_creates_missing_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.db");

        let conn = open_database(&path).unwrap();
        drop(conn);

        assert!(path.exists());
    }
}
