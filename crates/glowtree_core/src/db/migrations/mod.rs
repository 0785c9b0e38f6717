//! Layout steps for the `kv_entries` store.
//!
//! Each step is one SQL file; step `n` leaves `user_version = n`.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

/// Ordered `(version, sql)` steps. Versions strictly increase.
const STEPS: &[(u32, &str)] = &[(1, include_str!("0001_init.sql"))];

/// Layout version this build writes.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Layout version recorded in the open file.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Runs every step newer than the file's version inside one transaction.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_version();

    if found > supported {
        error!(
            "event=db_migrate module=db status=error error_code=schema_too_new found={found} supported={supported}"
        );
        return Err(DbError::SchemaTooNew { found, supported });
    }
    if found == supported {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in STEPS.iter().filter(|(version, _)| *version > found) {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok table=kv_entries from={found} to={supported}");
    Ok(())
}
