// ABOUTME: Settings proxy over an injected settings store
// ABOUTME: list/get/put/delete with permission denials translated to typed errors

use crate::error::SettingsResult;
use setkit_core::{Namespace, SettingEntry};
use setkit_storage::SettingsStore;
use std::sync::Arc;
use tracing::debug;

/// Performs settings operations against a store.
///
/// The proxy never checks permissions itself: it attempts the operation and
/// classifies any denial the store raises.
#[derive(Clone)]
pub struct SettingsProxy {
    store: Arc<dyn SettingsStore>,
}

impl SettingsProxy {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Every entry of the namespace, sorted case-insensitively by `key=value`.
    /// Each call queries the store again.
    pub async fn list(&self, namespace: Namespace) -> SettingsResult<Vec<SettingEntry>> {
        let mut entries = self.store.list(namespace).await?;
        entries.sort_by(SettingEntry::cmp_ignore_case);
        Ok(entries)
    }

    pub async fn get(&self, namespace: Namespace, key: &str) -> SettingsResult<Option<String>> {
        Ok(self.store.get(namespace, key).await?)
    }

    pub async fn put(&self, namespace: Namespace, key: &str, value: &str) -> SettingsResult<bool> {
        Ok(self.store.put(namespace, key, value).await?)
    }

    /// Delete `key` if exactly one row matches it. Returns the number of rows removed.
    pub async fn delete(&self, namespace: Namespace, key: &str) -> SettingsResult<u64> {
        let names = self.store.find(namespace, key).await?;

        match names.as_slice() {
            [name] => Ok(self.store.remove(namespace, name).await?),
            _ => {
                debug!(
                    "Skipping delete of {} in {}: {} matching rows",
                    key,
                    namespace,
                    names.len()
                );
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SettingsError;
    use async_trait::async_trait;
    use mockall::mock;
    use pretty_assertions::assert_eq;
    use setkit_core::Permission;
    use setkit_storage::{PermissionDenial, StorageError, StorageResult};

    mock! {
        pub Store {}

        #[async_trait]
        impl SettingsStore for Store {
            async fn list(&self, namespace: Namespace) -> StorageResult<Vec<SettingEntry>>;
            async fn get(&self, namespace: Namespace, name: &str) -> StorageResult<Option<String>>;
            async fn put(&self, namespace: Namespace, name: &str, value: &str) -> StorageResult<bool>;
            async fn find(&self, namespace: Namespace, name: &str) -> StorageResult<Vec<String>>;
            async fn remove(&self, namespace: Namespace, name: &str) -> StorageResult<u64>;
        }
    }

    fn proxy(store: MockStore) -> SettingsProxy {
        SettingsProxy::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_list_sorts_case_insensitively() {
        let mut store = MockStore::new();
        store.expect_list().times(1).returning(|_| {
            Ok(vec![
                SettingEntry::new("b", "2"),
                SettingEntry::new("A", "1"),
                SettingEntry::new("C", "3"),
            ])
        });

        let entries = proxy(store).list(Namespace::System).await.unwrap();
        assert_eq!(
            entries,
            vec![
                SettingEntry::new("A", "1"),
                SettingEntry::new("b", "2"),
                SettingEntry::new("C", "3"),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_queries_store_on_every_call() {
        let mut store = MockStore::new();
        store.expect_list().times(2).returning(|_| Ok(Vec::new()));

        let proxy = proxy(store);
        assert!(proxy.list(Namespace::Global).await.unwrap().is_empty());
        assert!(proxy.list(Namespace::Global).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_single_match_removes_resolved_name() {
        let mut store = MockStore::new();
        store
            .expect_find()
            .times(1)
            .returning(|_, _| Ok(vec!["x".to_string()]));
        store.expect_remove().times(1).returning(|_, _| Ok(1));

        assert_eq!(proxy(store).delete(Namespace::System, "x").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_ambiguous_match_removes_nothing() {
        let mut store = MockStore::new();
        store
            .expect_find()
            .times(1)
            .returning(|_, _| Ok(vec!["x".to_string(), "x".to_string()]));
        store.expect_remove().never();

        assert_eq!(proxy(store).delete(Namespace::System, "x").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_missing_key_never_removes() {
        let mut store = MockStore::new();
        store.expect_find().times(1).returning(|_, _| Ok(Vec::new()));
        store.expect_remove().never();

        assert_eq!(proxy(store).delete(Namespace::Secure, "x").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_put_denial_is_classified() {
        let mut store = MockStore::new();
        store.expect_put().times(1).returning(|_, _, _| {
            Err(StorageError::from(PermissionDenial::unclassified(Some(
                "Permission denial: writing requires android.permission.WRITE_SECURE_SETTINGS"
                    .to_string(),
            ))))
        });

        let result = proxy(store).put(Namespace::Global, "k", "v").await;
        assert!(matches!(
            result,
            Err(SettingsError::PermissionRequired(
                Permission::WriteSecureSettings
            ))
        ));
    }

    #[tokio::test]
    async fn test_remove_denial_without_message_is_unknown() {
        let mut store = MockStore::new();
        store
            .expect_find()
            .returning(|_, _| Ok(vec!["k".to_string()]));
        store
            .expect_remove()
            .returning(|_, _| Err(PermissionDenial::unclassified(None).into()));

        let result = proxy(store).delete(Namespace::System, "k").await;
        assert!(matches!(
            result,
            Err(SettingsError::UnknownSecurityException)
        ));
    }

    #[tokio::test]
    async fn test_get_passes_absent_value_through() {
        let mut store = MockStore::new();
        store.expect_get().times(1).returning(|_, _| Ok(None));

        assert_eq!(proxy(store).get(Namespace::System, "k").await.unwrap(), None);
    }
}
