//! Database connection utilities.

use crate::DatabaseResult;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use laurel_error::{DatabaseError, DatabaseErrorKind};
use std::path::Path;
use tracing::{debug, info};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a statement waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Open a SQLite database, creating its parent directory when needed.
///
/// `:memory:` opens a private in-memory database.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or SQLite refuses the
/// connection.
pub fn establish_connection(database_url: &str) -> DatabaseResult<SqliteConnection> {
    if database_url != ":memory:" && !database_url.starts_with("file:") {
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DatabaseError::new(DatabaseErrorKind::Connection(format!(
                        "Failed to create {}: {}",
                        parent.display(),
                        e
                    )))
                })?;
            }
        }
    }

    let mut conn = SqliteConnection::establish(database_url)?;
    conn.batch_execute(&format!(
        "PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}; PRAGMA foreign_keys = ON;"
    ))?;
    debug!(database_url, "Opened SQLite connection");
    Ok(conn)
}

/// Run pending migrations.
pub fn run_migrations(conn: &mut SqliteConnection) -> DatabaseResult<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))?;
    if !applied.is_empty() {
        info!(count = applied.len(), "Applied database migrations");
    }
    Ok(())
}
