use thiserror::Error;

/// Errors produced while parsing core tokens
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Unknown namespace: {0}")]
    UnknownNamespace(String),

    #[error("Unknown permission: {0}")]
    UnknownPermission(String),
}
