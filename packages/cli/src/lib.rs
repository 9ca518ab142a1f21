// ABOUTME: Library side of the setkit CLI
// ABOUTME: Store construction from configuration and single-request execution

pub mod config;
pub mod output;


use config::{Config, StoreBackend};
use setkit_settings::{Dispatcher, SettingsRequest};
use setkit_storage::{MemorySettingsStore, SettingsStore, SqliteSettingsStore, StorageResult};
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

/// Build the store selected by the configuration
pub async fn open_store(config: &Config) -> StorageResult<Arc<dyn SettingsStore>> {
    let granted = config.granted.iter().copied();
    let store: Arc<dyn SettingsStore> = match &config.store {
        StoreBackend::Sqlite(path) => Arc::new(SqliteSettingsStore::open(path, granted).await?),
        StoreBackend::Memory => Arc::new(MemorySettingsStore::with_permissions(granted)),
    };
    Ok(store)
}

/// Run one request against the configured store and render the outcome to `out`
pub async fn execute<W: Write>(
    config: &Config,
    request: &SettingsRequest,
    out: &mut W,
) -> anyhow::Result<()> {
    debug!(backend = ?config.store, granted = ?config.granted, "Opening settings store");
    let store = open_store(config).await?;
    let dispatcher = Dispatcher::new(store);

    let response = dispatcher.dispatch(request).await?;
    output::render(&response, config.format, out)
}
