use anyhow::Result;
use async_trait::async_trait;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::path::Path;
use tracing::info;

use super::DraftStore;
use crate::error::DraftError;
use crate::utils::logging::log_draft_operation;

/// Draft fields kept in a SQLite file so they survive a restart.
#[derive(Clone)]
pub struct SqliteDraftStore {
    pub pool: SqlitePool,
}

impl SqliteDraftStore {
    pub async fn new(database_url: &str) -> Result<Self> {
        if let Some(parent) = database_file(database_url).and_then(|p| p.parent()) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Create database if it doesn't exist
        if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
            info!("Creating draft store {}", database_url);
            Sqlite::create_database(database_url).await?;
        }

        let pool = SqlitePool::connect(database_url).await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running draft store migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Names of the tables currently in the store.
    pub async fn table_names(&self) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(&self.pool)
            .await
    }

    /// Cheap round trip used by the health endpoint.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

/// File path of a `sqlite:` URL, `None` for in-memory databases.
pub fn database_file(database_url: &str) -> Option<&Path> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(Path::new(path))
}

#[async_trait]
impl DraftStore for SqliteDraftStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), DraftError> {
        log_draft_operation("SET", key);
        sqlx::query(
            "INSERT INTO draft_values (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DraftError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM draft_values WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<(), DraftError> {
        log_draft_operation("DEL", key);
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM draft_values WHERE key = ?")
            .bind(key)
            .execute(&mut tx)
            .await?;
        sqlx::query("DELETE FROM draft_lists WHERE key = ?")
            .bind(key)
            .execute(&mut tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn append(&self, key: &str, value: &str) -> Result<(), DraftError> {
        log_draft_operation("APPEND", key);
        sqlx::query("INSERT INTO draft_lists (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn read_list(&self, key: &str) -> Result<Vec<String>, DraftError> {
        let values = sqlx::query_scalar::<_, String>(
            "SELECT value FROM draft_lists WHERE key = ? ORDER BY id",
        )
        .bind(key)
        .fetch_all(&self.pool)
        .await?;
        Ok(values)
    }
}
