use setkit_core::{database_file, CoreError, Permission};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Database path value that selects the in-memory store
pub const MEMORY_DATABASE: &str = ":memory:";

/// Permissions granted when `SETKIT_GRANTED_PERMISSIONS` is unset
pub const DEFAULT_GRANTED_PERMISSIONS: &str = "WRITE_SETTINGS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    InvalidPermission(#[from] CoreError),
    #[error("Invalid output format: {0}")]
    InvalidOutputFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One result line per outcome
    Text,
    /// The tagged response as a JSON document
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidOutputFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite(PathBuf),
    Memory,
}

impl StoreBackend {
    fn from_path(path: &str) -> Self {
        if path == MEMORY_DATABASE {
            StoreBackend::Memory
        } else {
            StoreBackend::Sqlite(PathBuf::from(path))
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreBackend,
    pub granted: Vec<Permission>,
    pub format: OutputFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_overrides(None, None)
    }

    /// Like [`Config::from_env`], but a given override replaces its variable.
    /// A replaced variable is never parsed, so a bad value there is ignored.
    pub fn from_env_with_overrides(
        grants: Option<&str>,
        format: Option<OutputFormat>,
    ) -> Result<Self, ConfigError> {
        let store = match env::var("SETKIT_DB_PATH") {
            Ok(path) if !path.trim().is_empty() => StoreBackend::from_path(path.trim()),
            _ => StoreBackend::Sqlite(database_file()),
        };

        let granted = match grants {
            Some(grants) => parse_permissions(grants)?,
            None => parse_permissions(
                &env::var("SETKIT_GRANTED_PERMISSIONS")
                    .unwrap_or_else(|_| DEFAULT_GRANTED_PERMISSIONS.to_string()),
            )?,
        };

        let format = match format {
            Some(format) => format,
            None => env::var("SETKIT_OUTPUT_FORMAT")
                .unwrap_or_else(|_| "text".to_string())
                .parse::<OutputFormat>()?,
        };

        Ok(Config {
            store,
            granted,
            format,
        })
    }

    /// Point the store at a database file, or at memory for `:memory:`
    pub fn with_database(mut self, path: &str) -> Self {
        self.store = StoreBackend::from_path(path);
        self
    }
}

/// Parse a comma-separated permission list. Blank entries are skipped.
pub fn parse_permissions(value: &str) -> Result<Vec<Permission>, ConfigError> {
    let mut permissions = Vec::new();
    for name in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let permission = name.parse::<Permission>()?;
        if !permissions.contains(&permission) {
            permissions.push(permission);
        }
    }
    Ok(permissions)
}
