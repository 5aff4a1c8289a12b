pub mod models;
pub mod repositories;

use std::{str::FromStr, time::Duration};

use anyhow::Context;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

/// Create a SQLite connection pool.
///
/// The database file (and its parent directory) is created when missing.
/// WAL mode lets read-only queries run while an answer is being recorded.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid database url: {database_url}"))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .context("failed to connect to database")?;

    Ok(pool)
}

/// Create a private in-memory database with migrations applied.
///
/// The pool holds exactly one connection that never expires, since every
/// SQLite in-memory connection is its own database.
pub async fn create_memory_pool() -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("failed to open in-memory database")?;

    migrate(&pool).await?;

    Ok(pool)
}

/// Run the migrations in this crate's `migrations/` folder.
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    // Migrations are bundled at compile time
    sqlx::migrate!()
        .run(pool)
        .await
        .context("failed to run migrations")?;

    Ok(())
}

/// Truncate a timestamp to the precision stored in the database.
///
/// Timestamps are stored as RFC 3339 text; at whole seconds the text order
/// matches the chronological order, which the `<=` comparisons rely on.
pub fn db_time(time: DateTime<Utc>) -> DateTime<Utc> {
    time.trunc_subsecs(0)
}
