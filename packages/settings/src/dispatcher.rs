// ABOUTME: Request dispatcher for settings commands
// ABOUTME: Validates a raw request, routes it to the proxy and shapes the response

use crate::error::SettingsError;
use crate::proxy::SettingsProxy;
use crate::types::{ErrorCode, Operation, Response, SettingsRequest};
use crate::validation::validate_request;
use setkit_storage::{SettingsStore, StorageResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Stateless entry point: one request in, one [`Response`] out
#[derive(Clone)]
pub struct Dispatcher {
    proxy: SettingsProxy,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            proxy: SettingsProxy::new(store),
        }
    }

    /// Handle one request.
    ///
    /// Validation failures and permission denials come back as
    /// `Ok(Response::Error(_))`. Any other store failure is returned as `Err`.
    pub async fn dispatch(&self, request: &SettingsRequest) -> StorageResult<Response> {
        debug!(
            method = ?request.method,
            namespace = ?request.namespace,
            "Handling settings request"
        );

        let operation = match validate_request(request) {
            Ok(operation) => operation,
            Err(e) => {
                debug!("Rejected settings request: {}", e);
                return Ok(Response::Error(e.into()));
            }
        };

        let method = operation.method();
        let namespace = operation.namespace();

        let outcome = match operation {
            Operation::List { namespace } => self.proxy.list(namespace).await.map(Response::Entries),
            Operation::Get { namespace, key } => {
                self.proxy.get(namespace, &key).await.map(Response::Value)
            }
            Operation::Put {
                namespace,
                key,
                value,
            } => self
                .proxy
                .put(namespace, &key, &value)
                .await
                .map(Response::Written),
            Operation::Delete { namespace, key } => {
                self.proxy.delete(namespace, &key).await.map(Response::Deleted)
            }
        };

        match outcome {
            Ok(response) => Ok(response),
            Err(SettingsError::PermissionRequired(permission)) => {
                warn!(
                    "{} on {} denied: {} required",
                    method,
                    namespace,
                    permission.qualified_name()
                );
                Ok(Response::Error(ErrorCode::PermissionRequired(permission)))
            }
            Err(SettingsError::UnknownSecurityException) => {
                warn!("{} on {} denied for an unrecognized reason", method, namespace);
                Ok(Response::Error(ErrorCode::UnknownSecurityException))
            }
            Err(SettingsError::Storage(e)) => Err(e),
        }
    }
}
