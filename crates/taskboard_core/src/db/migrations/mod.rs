//! Schema steps for the task database.
//!
//! Step `n` in `SCHEMA_STEPS` brings the schema to version `n + 1`; the
//! version reached is stored in `PRAGMA user_version`.
//!
//! # See also
//! - `0001_tasks.sql` for the `tasks` table and its flag columns.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

struct SchemaStep {
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    name: "tasks",
    sql: include_str!("0001_tasks.sql"),
}];

/// Schema version this build creates and understands.
pub fn latest_schema_version() -> u32 {
    SCHEMA_STEPS.len() as u32
}

/// Brings `conn` up to `latest_schema_version`.
///
/// Pending steps run in a single transaction, so a failing step leaves the
/// database at its previous version.
///
/// # Errors
/// - `DbError::SchemaTooNew` when the file is ahead of this build.
/// - `DbError::Migration` naming the step whose SQL failed.
///
/// # Side effects
/// - Writes `PRAGMA user_version` and emits `db_migrate` when steps ran.
pub fn upgrade_schema(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_schema_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }
    if found == supported {
        debug!("event=db_migrate module=db status=skip version={found}");
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (index, step) in SCHEMA_STEPS.iter().enumerate().skip(found as usize) {
        let version = index as u32 + 1;
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", version))
            .map_err(|source| DbError::Migration {
                version,
                name: step.name,
                source,
            })?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from={found} to={supported}");
    Ok(())
}

/// Schema version recorded in the database file.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
