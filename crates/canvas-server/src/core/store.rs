//! SQLite document store
//!
//! Two logical collections, `users` and `canvas`, each keyed by a generated
//! UUID. One pool is opened at startup and shared by every repository.
//! Every call goes through [`Database::bounded`] so a stalled store surfaces
//! as [`Error::StoreTimeout`] instead of hanging the request.

use std::future::Future;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::core::config::ServerConfig;
use crate::core::error::{Error, Result};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT UNIQUE NOT NULL,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS canvas (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        owner TEXT NOT NULL,
        shared TEXT NOT NULL DEFAULT '[]',
        elements TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (owner) REFERENCES users(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_canvas_owner ON canvas(owner)",
];

/// Handle to the document store.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
    timeout: Duration,
}

impl Database {
    /// Open (creating if missing) the database described by `config`.
    pub async fn connect(config: &ServerConfig) -> anyhow::Result<Self> {
        config.ensure_dirs().await?;
        let db_path = config.database_path();

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(config.store_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .acquire_timeout(config.store_timeout)
            .connect_with(options)
            .await?;

        let db = Self {
            pool,
            timeout: config.store_timeout,
        };
        db.init_schema().await?;

        info!("[Store] Opened {:?}", db_path);

        Ok(db)
    }

    async fn init_schema(&self) -> anyhow::Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run one store operation under the configured timeout.
    pub async fn bounded<T, F>(&self, op: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(result) => result.map_err(Error::from),
            Err(_) => Err(Error::StoreTimeout),
        }
    }
}

/// True when `err` is a UNIQUE / PRIMARY KEY violation.
pub fn is_unique_violation(err: &Error) -> bool {
    match err {
        Error::Store(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_connect_creates_database_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = ServerConfig::with_base_dir(temp_dir.path().join("nested"), "secret");

        let db = Database::connect(&config).await.unwrap();
        assert!(config.database_path().exists());

        // Schema creation is idempotent
        db.init_schema().await.unwrap();
    }

    #[tokio::test]
    async fn test_slow_operation_surfaces_as_timeout() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = ServerConfig::with_base_dir(temp_dir.path(), "secret");
        config.store_timeout = Duration::from_millis(20);
        let db = Database::connect(&config).await.unwrap();

        let result = db
            .bounded(async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                Ok::<_, sqlx::Error>(())
            })
            .await;

        assert!(matches!(result, Err(Error::StoreTimeout)));
    }
}
