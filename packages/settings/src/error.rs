use setkit_core::Permission;
use setkit_storage::StorageError;
use thiserror::Error;

/// Result type for settings proxy operations
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Failures of a settings operation, with permission denials already classified
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{} required", .0.qualified_name())]
    PermissionRequired(Permission),

    #[error("Unknown Security Exception")]
    UnknownSecurityException,

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for SettingsError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::PermissionDenied(denial) => match denial.permission() {
                Some(permission) => SettingsError::PermissionRequired(permission),
                None => SettingsError::UnknownSecurityException,
            },
            other => SettingsError::Storage(other),
        }
    }
}
