// ABOUTME: Input validation for settings requests
// ABOUTME: Presence and enumeration checks, run before the store is touched

use crate::types::{Method, Operation, SettingsRequest};
use setkit_core::Namespace;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid Namespace")]
    InvalidNamespace,

    #[error("Invalid Method")]
    InvalidMethod,

    #[error("KeyName is Null")]
    MissingKey,

    #[error("KeyValue is Null")]
    MissingValue,
}

/// Validate a raw request into an [`Operation`].
///
/// Checks run in a fixed order and stop at the first failure: namespace,
/// method, key, then value. Empty strings count as present.
pub fn validate_request(request: &SettingsRequest) -> Result<Operation, ValidationError> {
    let namespace = request
        .namespace
        .as_deref()
        .and_then(|namespace| namespace.parse::<Namespace>().ok())
        .ok_or(ValidationError::InvalidNamespace)?;

    let method = request
        .method
        .as_deref()
        .ok_or(ValidationError::InvalidMethod)?
        .parse::<Method>()?;

    let operation = match method {
        Method::List => Operation::List { namespace },
        Method::Get => Operation::Get {
            namespace,
            key: require_key(request)?,
        },
        Method::Put => {
            let key = require_key(request)?;
            let value = request
                .value
                .clone()
                .ok_or(ValidationError::MissingValue)?;
            Operation::Put {
                namespace,
                key,
                value,
            }
        }
        Method::Delete => Operation::Delete {
            namespace,
            key: require_key(request)?,
        },
    };

    Ok(operation)
}

fn require_key(request: &SettingsRequest) -> Result<String, ValidationError> {
    request.key.clone().ok_or(ValidationError::MissingKey)
}
