// ABOUTME: Settings request handling for setkit
// ABOUTME: Validates list/get/put/delete requests and routes them to the settings store

pub mod dispatcher;
pub mod error;
pub mod proxy;
pub mod types;
pub mod validation;

pub use dispatcher::Dispatcher;
pub use error::{SettingsError, SettingsResult};
pub use proxy::SettingsProxy;
pub use types::*;
pub use validation::{validate_request, ValidationError};
