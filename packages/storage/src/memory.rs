// ABOUTME: In-memory settings store
// ABOUTME: Ephemeral backend and test fake with injectable permission denials

use crate::{PermissionDenial, SettingsStore, StorageResult};
use async_trait::async_trait;
use setkit_core::{Namespace, Permission, SettingEntry};
use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone)]
struct Row {
    namespace: Namespace,
    name: String,
    value: String,
}

/// Settings kept in a vector of rows.
///
/// Unlike the SQLite store, rows are not unique by name: [`insert_row`]
/// can add duplicates so callers can exercise ambiguous lookups.
///
/// [`insert_row`]: MemorySettingsStore::insert_row
#[derive(Debug)]
pub struct MemorySettingsStore {
    rows: RwLock<Vec<Row>>,
    granted: BTreeSet<Permission>,
    denials: RwLock<HashMap<Namespace, PermissionDenial>>,
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySettingsStore {
    /// Store that grants every permission
    pub fn new() -> Self {
        Self::with_permissions(Permission::ALL)
    }

    /// Store that only accepts writes covered by `granted`
    pub fn with_permissions(granted: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            granted: granted.into_iter().collect(),
            denials: RwLock::new(HashMap::new()),
        }
    }

    /// Append a raw row without checking permissions or uniqueness
    pub fn insert_row(&self, namespace: Namespace, name: impl Into<String>, value: impl Into<String>) {
        self.write_rows().push(Row {
            namespace,
            name: name.into(),
            value: value.into(),
        });
    }

    /// Make every write to `namespace` fail with `denial`
    pub fn deny_writes(&self, namespace: Namespace, denial: PermissionDenial) {
        self.denials
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(namespace, denial);
    }

    /// Number of rows stored in `namespace`
    pub fn len(&self, namespace: Namespace) -> usize {
        self.read_rows()
            .iter()
            .filter(|row| row.namespace == namespace)
            .count()
    }

    pub fn is_empty(&self, namespace: Namespace) -> bool {
        self.len(namespace) == 0
    }

    fn read_rows(&self) -> RwLockReadGuard<'_, Vec<Row>> {
        self.rows
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_rows(&self) -> RwLockWriteGuard<'_, Vec<Row>> {
        self.rows
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_write(&self, namespace: Namespace) -> StorageResult<()> {
        let injected = self
            .denials
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&namespace)
            .cloned();
        if let Some(denial) = injected {
            return Err(denial.into());
        }

        let required = namespace.required_permission();
        if self.granted.contains(&required) {
            Ok(())
        } else {
            Err(PermissionDenial::requires(required).into())
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn list(&self, namespace: Namespace) -> StorageResult<Vec<SettingEntry>> {
        Ok(self
            .read_rows()
            .iter()
            .filter(|row| row.namespace == namespace)
            .map(|row| SettingEntry::new(row.name.clone(), row.value.clone()))
            .collect())
    }

    async fn get(&self, namespace: Namespace, name: &str) -> StorageResult<Option<String>> {
        Ok(self
            .read_rows()
            .iter()
            .find(|row| row.namespace == namespace && row.name == name)
            .map(|row| row.value.clone()))
    }

    async fn put(&self, namespace: Namespace, name: &str, value: &str) -> StorageResult<bool> {
        self.check_write(namespace)?;

        let mut rows = self.write_rows();
        let existing = rows
            .iter()
            .position(|row| row.namespace == namespace && row.name == name);
        match existing {
            Some(index) => rows[index].value = value.to_string(),
            None => rows.push(Row {
                namespace,
                name: name.to_string(),
                value: value.to_string(),
            }),
        }

        Ok(true)
    }

    async fn find(&self, namespace: Namespace, name: &str) -> StorageResult<Vec<String>> {
        Ok(self
            .read_rows()
            .iter()
            .filter(|row| row.namespace == namespace && row.name == name)
            .map(|row| row.name.clone())
            .collect())
    }

    async fn remove(&self, namespace: Namespace, name: &str) -> StorageResult<u64> {
        self.check_write(namespace)?;

        let mut rows = self.write_rows();
        let before = rows.len();
        rows.retain(|row| !(row.namespace == namespace && row.name == name));

        Ok((before - rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageError;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_put_replaces_existing_value() {
        let store = MemorySettingsStore::new();
        assert!(store.put(Namespace::System, "font_scale", "1.0").await.unwrap());
        assert!(store.put(Namespace::System, "font_scale", "1.3").await.unwrap());

        assert_eq!(store.len(Namespace::System), 1);
        assert_eq!(
            store.get(Namespace::System, "font_scale").await.unwrap(),
            Some("1.3".to_string())
        );
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let store = MemorySettingsStore::new();
        store.put(Namespace::Secure, "adb_enabled", "1").await.unwrap();

        assert_eq!(store.get(Namespace::Global, "adb_enabled").await.unwrap(), None);
        assert!(store.is_empty(Namespace::Global));
        assert_eq!(store.list(Namespace::Secure).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_permission_is_reported() {
        let store = MemorySettingsStore::with_permissions([Permission::WriteSettings]);
        assert!(store.put(Namespace::System, "a", "1").await.is_ok());

        match store.put(Namespace::Global, "a", "1").await {
            Err(StorageError::PermissionDenied(denial)) => {
                assert_eq!(denial.permission(), Some(Permission::WriteSecureSettings));
            }
            other => panic!("Expected PermissionDenied, got {:?}", other),
        }
        assert!(store.is_empty(Namespace::Global));
    }

    #[tokio::test]
    async fn test_injected_denial_overrides_grants() {
        let store = MemorySettingsStore::new();
        store.deny_writes(Namespace::System, PermissionDenial::unclassified(None));

        let result = store.remove(Namespace::System, "a").await;
        assert!(matches!(
            result,
            Err(StorageError::PermissionDenied(PermissionDenial {
                permission: None,
                message: None
            }))
        ));
    }

    #[tokio::test]
    async fn test_remove_drops_duplicates() {
        let store = MemorySettingsStore::new();
        store.insert_row(Namespace::System, "dup", "1");
        store.insert_row(Namespace::System, "dup", "2");
        store.insert_row(Namespace::Secure, "dup", "3");

        assert_eq!(store.find(Namespace::System, "dup").await.unwrap().len(), 2);
        assert_eq!(store.remove(Namespace::System, "dup").await.unwrap(), 2);
        assert_eq!(store.len(Namespace::Secure), 1);
    }
}
