use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::debug;

use crate::config::SqliteConfig;
use crate::error::StoreError;
use crate::migrations;

/// Build `SqliteConnectOptions` from a [`SqliteConfig`].
pub(crate) fn build_connect_options(config: &SqliteConfig) -> SqliteConnectOptions {
    let mut options = SqliteConnectOptions::new()
        .filename(&config.path)
        .create_if_missing(config.create_if_missing)
        .foreign_keys(true);

    // WAL lets concurrent readers proceed against a file-backed database;
    // an in-memory database has no journal file to configure.
    if !config.is_in_memory() {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    options
}

/// Handle to a per-actor SQLite database.
///
/// Wraps an `sqlx::SqlitePool`; cloning is cheap and shares the pool.
#[derive(Clone)]
pub struct ActorDb {
    pool: SqlitePool,
}

impl ActorDb {
    /// Open the database described by `config`.
    ///
    /// Creates the connection pool and runs migrations to ensure the
    /// required tables exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if pool creation fails, or
    /// [`StoreError::Migration`] if migrations fail.
    pub async fn connect(config: &SqliteConfig) -> Result<Self, StoreError> {
        let options = build_connect_options(config);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        migrations::run_migrations(&pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        debug!(path = %config.path, "opened actor database");
        Ok(Self { pool })
    }

    /// Create an `ActorDb` from an existing pool.
    ///
    /// This is useful for sharing a pool across components. Runs migrations
    /// on creation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Migration`] if migrations fail.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        migrations::run_migrations(&pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        Ok(Self { pool })
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_in_memory_and_migrate() {
        let db = ActorDb::connect(&SqliteConfig::in_memory()).await.unwrap();

        // Migrations are idempotent.
        migrations::run_migrations(db.pool()).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('blob', 'record', 'record_blob') ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();
        assert_eq!(tables, ["blob", "record", "record_blob"]);
    }
}
