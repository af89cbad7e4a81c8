//! Database migrations for athena.
//!
//! Each migration upgrades the schema by one version. Migrations are run
//! automatically when the database is opened.

use rusqlite::Connection;

use crate::error::AthenaError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 if no version has been set (new database).
pub fn get_version(conn: &Connection) -> Result<i32, AthenaError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| AthenaError::Database(format!("Failed to get schema version: {e}")))
}

fn set_version(conn: &Connection, version: i32) -> Result<(), AthenaError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| AthenaError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), AthenaError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        run_migration(conn, version)?;
        set_version(conn, version)?;
    }

    Ok(())
}

fn run_migration(conn: &Connection, version: i32) -> Result<(), AthenaError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(AthenaError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: key-value blob table.
fn migrate_v1(conn: &Connection) -> Result<(), AthenaError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| AthenaError::Database(format!("Migration v1 failed: {e}")))
}
