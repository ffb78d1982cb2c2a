//! Database module for msgboard.
//!
//! This module provides SQLite connectivity through a sqlx pool and
//! migration management.

mod schema;

pub use schema::MIGRATIONS;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info, warn};

use crate::config::DatabaseConfig;
use crate::{MsgboardError, Result};

/// Connection pool type used by repositories.
pub type DbPool = SqlitePool;

/// Database wrapper owning the connection pool.
///
/// Created once at startup and shared by every request; call [`Database::close`]
/// on shutdown.
pub struct Database {
    pool: DbPool,
    in_memory: bool,
}

impl Database {
    /// Open a file-backed database at the specified path.
    ///
    /// Parent directories and the file are created when missing.
    /// Migrations are applied automatically.
    pub async fn open(path: impl AsRef<Path>, max_connections: u32) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening database at {:?}", path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| MsgboardError::DatabaseConnection(e.to_string()))?;

        let db = Self {
            pool,
            in_memory: false,
        };
        db.migrate().await?;

        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// The pool is pinned to a single connection that never expires, since each
    /// SQLite in-memory connection is its own database.
    pub async fn open_in_memory() -> Result<Self> {
        debug!("Opening in-memory database");

        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| MsgboardError::DatabaseConnection(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| MsgboardError::DatabaseConnection(e.to_string()))?;

        let db = Self {
            pool,
            in_memory: true,
        };
        db.migrate().await?;

        Ok(db)
    }

    /// Open the database described by `config`.
    ///
    /// When the configured file cannot be opened and `fallback_to_memory` is
    /// set, an in-memory database is used instead.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        if config.is_in_memory() {
            return Self::open_in_memory().await;
        }

        match Self::open(&config.path, config.max_connections).await {
            Ok(db) => Ok(db),
            Err(e) if config.fallback_to_memory => {
                warn!(
                    path = %config.path,
                    error = %e,
                    "Database unavailable, falling back to in-memory database"
                );
                Self::open_in_memory().await
            }
            Err(e) => Err(e),
        }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Whether this database lives only in memory.
    pub fn is_in_memory(&self) -> bool {
        self.in_memory
    }

    /// Get the current schema version.
    pub async fn schema_version(&self) -> Result<i64> {
        if !self.table_exists("schema_version").await? {
            return Ok(0);
        }

        let version: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_version")
                .fetch_one(&self.pool)
                .await?;

        Ok(version)
    }

    /// Apply pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        let current_version = self.schema_version().await?;

        if current_version as usize >= MIGRATIONS.len() {
            debug!("Database is up to date (version {})", current_version);
            return Ok(());
        }

        info!(
            "Migrating database from version {} to {}",
            current_version,
            MIGRATIONS.len()
        );

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version     INTEGER PRIMARY KEY,
                applied_at  TEXT NOT NULL DEFAULT (datetime('now'))
            )",
        )
        .execute(&self.pool)
        .await?;

        for (i, migration) in MIGRATIONS.iter().enumerate().skip(current_version as usize) {
            let version = (i + 1) as i64;
            info!("Applying migration v{}", version);

            let mut tx = self.pool.begin().await?;

            sqlx::raw_sql(migration).execute(&mut *tx).await?;
            sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
                .bind(version)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            debug!("Migration v{} applied successfully", version);
        }

        info!(
            "Database migration complete (now at version {})",
            MIGRATIONS.len()
        );
        Ok(())
    }

    /// Check if a table exists.
    pub async fn table_exists(&self, table_name: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?)",
        )
        .bind(table_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Close the pool, waiting for in-flight connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database closed");
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("in_memory", &self.in_memory)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(db.is_in_memory());
        assert!(db.schema_version().await.unwrap() > 0);
    }

    #[tokio::test]
    async fn test_migrations_applied() {
        let db = Database::open_in_memory().await.unwrap();
        let version = db.schema_version().await.unwrap();
        assert_eq!(version as usize, MIGRATIONS.len());
    }

    #[tokio::test]
    async fn test_threads_table_exists() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(db.table_exists("threads").await.unwrap());
        assert!(db.table_exists("schema_version").await.unwrap());
        assert!(!db.table_exists("nonexistent").await.unwrap());
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let db = Database::open_in_memory().await.unwrap();
        db.migrate().await.unwrap();
        assert_eq!(db.schema_version().await.unwrap() as usize, MIGRATIONS.len());
    }

    #[tokio::test]
    async fn test_open_file_database() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("board.db");

        {
            let db = Database::open(&db_path, 2).await.unwrap();
            assert!(!db.is_in_memory());
            assert!(db.table_exists("threads").await.unwrap());
            db.close().await;
        }

        // Reopen: migrations must not be reapplied
        let db = Database::open(&db_path, 2).await.unwrap();
        assert_eq!(db.schema_version().await.unwrap() as usize, MIGRATIONS.len());
        db.close().await;
    }

    #[tokio::test]
    async fn test_connect_in_memory_path() {
        let config = DatabaseConfig {
            path: String::new(),
            ..Default::default()
        };
        let db = Database::connect(&config).await.unwrap();
        assert!(db.is_in_memory());
    }

    #[tokio::test]
    async fn test_connect_falls_back_to_memory() {
        let temp_dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a database file.
        let config = DatabaseConfig {
            path: temp_dir.path().to_string_lossy().into_owned(),
            fallback_to_memory: true,
            ..Default::default()
        };

        let db = Database::connect(&config).await.unwrap();
        assert!(db.is_in_memory());
        assert!(db.table_exists("threads").await.unwrap());
    }

    #[tokio::test]
    async fn test_connect_without_fallback_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            path: temp_dir.path().to_string_lossy().into_owned(),
            fallback_to_memory: false,
            ..Default::default()
        };

        let result = Database::connect(&config).await;
        assert!(matches!(result, Err(MsgboardError::DatabaseConnection(_))));
    }
}
