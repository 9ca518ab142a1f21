// ABOUTME: Settings store abstraction and persistence for setkit
// ABOUTME: Store trait, storage errors, SQLite and in-memory implementations

use async_trait::async_trait;
use setkit_core::{Namespace, Permission, SettingEntry};
use thiserror::Error;

pub mod memory;
pub mod sqlite;

pub use memory::MemorySettingsStore;
pub use sqlite::SqliteSettingsStore;

/// A store refused a write because the caller lacks a permission.
///
/// Stores that know which permission was missing set `permission`; stores
/// that only surface free text leave it empty and carry the text in `message`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Permission denial: {}", .message.as_deref().unwrap_or("no message"))]
pub struct PermissionDenial {
    pub permission: Option<Permission>,
    pub message: Option<String>,
}

impl PermissionDenial {
    /// Denial for a known missing permission
    pub fn requires(permission: Permission) -> Self {
        Self {
            permission: Some(permission),
            message: Some(format!(
                "writing to settings requires {}",
                permission.qualified_name()
            )),
        }
    }

    /// Denial that only carries whatever text the backend reported
    pub fn unclassified(message: Option<String>) -> Self {
        Self {
            permission: None,
            message,
        }
    }

    /// The missing permission: the explicit kind if present, otherwise
    /// whatever can be recognized in the message.
    pub fn permission(&self) -> Option<Permission> {
        self.permission
            .or_else(|| self.message.as_deref().and_then(Permission::from_message))
    }
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenial),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Per-namespace key/value primitives every settings backend provides.
///
/// Reads never require a permission. Writes (`put`, `remove`) may fail with
/// [`StorageError::PermissionDenied`].
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// All entries of a namespace, in store order
    async fn list(&self, namespace: Namespace) -> StorageResult<Vec<SettingEntry>>;

    /// Value stored under `name`, if any
    async fn get(&self, namespace: Namespace, name: &str) -> StorageResult<Option<String>>;

    /// Insert or replace a value. Returns whether the store accepted the write.
    async fn put(&self, namespace: Namespace, name: &str, value: &str) -> StorageResult<bool>;

    /// Names of every row matching `name`
    async fn find(&self, namespace: Namespace, name: &str) -> StorageResult<Vec<String>>;

    /// Delete every row named `name`, returning how many were removed
    async fn remove(&self, namespace: Namespace, name: &str) -> StorageResult<u64>;
}
