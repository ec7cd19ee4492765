//! Connection bootstrap for the task database.
//!
//! # See also
//! - `crate::db::migrations` for the schema steps applied on open.
//! - `crate::store::sqlite_store`, the only caller outside tests.

use super::migrations::upgrade_schema;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// How long a writer waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the task database at `path`, upgrading its schema.
///
/// # Errors
/// - `DbError::Sqlite` when the file cannot be opened or configured.
/// - `DbError::Migration` / `DbError::SchemaTooNew` from `upgrade_schema`.
///
/// # Side effects
/// - Creates the file when it does not exist.
/// - Emits one `db_open` event with `mode=file` and `duration_ms`.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let outcome = Connection::open(path)
        .map_err(Into::into)
        .and_then(prepare);
    log_open("file", started_at, outcome)
}

/// In-memory database for tests and throwaway boards.
///
/// # Side effects
/// - Emits one `db_open` event with `mode=memory`.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    let outcome = Connection::open_in_memory()
        .map_err(Into::into)
        .and_then(prepare);
    log_open("memory", started_at, outcome)
}

fn prepare(mut conn: Connection) -> DbResult<Connection> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    upgrade_schema(&mut conn)?;
    Ok(conn)
}

fn log_open(
    mode: &str,
    started_at: Instant,
    outcome: DbResult<Connection>,
) -> DbResult<Connection> {
    let elapsed_ms = started_at.elapsed().as_millis();
    match &outcome {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={elapsed_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={elapsed_ms} error={err}"
        ),
    }
    outcome
}
