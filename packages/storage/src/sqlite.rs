// ABOUTME: SQLite-backed settings store
// ABOUTME: One table partitioned by namespace, writes gated by granted permissions

use crate::{PermissionDenial, SettingsStore, StorageResult};
use async_trait::async_trait;
use setkit_core::{Namespace, Permission, SettingEntry};
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const MAX_CONNECTIONS: u32 = 4;
const BUSY_TIMEOUT_SECONDS: u64 = 30;

pub struct SqliteSettingsStore {
    pool: SqlitePool,
    granted: BTreeSet<Permission>,
}

impl SqliteSettingsStore {
    /// Wrap an already migrated pool
    pub fn new(pool: SqlitePool, granted: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            pool,
            granted: granted.into_iter().collect(),
        }
    }

    /// Open (creating if needed) the database at `path` and run migrations
    pub async fn open(
        path: &Path,
        granted: impl IntoIterator<Item = Permission>,
    ) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECONDS));

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        MIGRATOR.run(&pool).await?;
        debug!("Opened settings database at {}", path.display());

        Ok(Self::new(pool, granted))
    }

    /// Private in-memory database, gone once the store is dropped
    pub async fn open_in_memory(
        granted: impl IntoIterator<Item = Permission>,
    ) -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        // Every connection would see its own empty database, so keep exactly one alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        MIGRATOR.run(&pool).await?;

        Ok(Self::new(pool, granted))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn granted(&self) -> impl Iterator<Item = Permission> + '_ {
        self.granted.iter().copied()
    }

    fn check_write(&self, namespace: Namespace) -> StorageResult<()> {
        let required = namespace.required_permission();
        if self.granted.contains(&required) {
            Ok(())
        } else {
            Err(PermissionDenial::requires(required).into())
        }
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn list(&self, namespace: Namespace) -> StorageResult<Vec<SettingEntry>> {
        let rows = sqlx::query("SELECT name, value FROM settings WHERE namespace = ? ORDER BY id")
            .bind(namespace.as_str())
            .fetch_all(&self.pool)
            .await?;

        let entries = rows
            .into_iter()
            .map(|row| -> StorageResult<SettingEntry> {
                Ok(SettingEntry {
                    key: row.try_get("name")?,
                    value: row.try_get("value")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    async fn get(&self, namespace: Namespace, name: &str) -> StorageResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM settings WHERE namespace = ? AND name = ?",
        )
        .bind(namespace.as_str())
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn put(&self, namespace: Namespace, name: &str, value: &str) -> StorageResult<bool> {
        self.check_write(namespace)?;

        let result = sqlx::query(
            "INSERT INTO settings (namespace, name, value)
             VALUES (?, ?, ?)
             ON CONFLICT(namespace, name)
             DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        )
        .bind(namespace.as_str())
        .bind(name)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find(&self, namespace: Namespace, name: &str) -> StorageResult<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT name FROM settings WHERE namespace = ? AND name = ?",
        )
        .bind(namespace.as_str())
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    async fn remove(&self, namespace: Namespace, name: &str) -> StorageResult<u64> {
        self.check_write(namespace)?;

        let result = sqlx::query("DELETE FROM settings WHERE namespace = ? AND name = ?")
            .bind(namespace.as_str())
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
