// ABOUTME: Type definitions for settings requests and responses
// ABOUTME: Methods, validated operations, tagged outcomes and their line rendering

use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use setkit_core::{Namespace, Permission, SettingEntry};
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use thiserror::Error;

/// Operation requested on a namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    List,
    Get,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::List => "list",
            Method::Get => "get",
            Method::Put => "put",
            Method::Delete => "delete",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "list" => Ok(Method::List),
            "get" => Ok(Method::Get),
            "put" => Ok(Method::Put),
            "delete" => Ok(Method::Delete),
            _ => Err(ValidationError::InvalidMethod),
        }
    }
}

/// Raw request as delivered by the transport. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRequest {
    pub method: Option<String>,
    pub namespace: Option<String>,
    pub key: Option<String>,
    pub value: Option<String>,
}

impl SettingsRequest {
    pub fn new(method: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            namespace: Some(namespace.into()),
            ..Self::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// A request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    List {
        namespace: Namespace,
    },
    Get {
        namespace: Namespace,
        key: String,
    },
    Put {
        namespace: Namespace,
        key: String,
        value: String,
    },
    Delete {
        namespace: Namespace,
        key: String,
    },
}

impl Operation {
    pub fn namespace(&self) -> Namespace {
        match self {
            Operation::List { namespace }
            | Operation::Get { namespace, .. }
            | Operation::Put { namespace, .. }
            | Operation::Delete { namespace, .. } => *namespace,
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Operation::List { .. } => Method::List,
            Operation::Get { .. } => Method::Get,
            Operation::Put { .. } => Method::Put,
            Operation::Delete { .. } => Method::Delete,
        }
    }
}

/// Error outcome reported back to the caller as an `ERR:` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", content = "permission", rename_all = "snake_case")]
pub enum ErrorCode {
    #[error("Invalid Namespace")]
    InvalidNamespace,

    #[error("Invalid Method")]
    InvalidMethod,

    #[error("KeyName is Null")]
    KeyNameIsNull,

    #[error("KeyValue is Null")]
    KeyValueIsNull,

    #[error("{} required", .0.qualified_name())]
    PermissionRequired(Permission),

    #[error("Unknown Security Exception")]
    UnknownSecurityException,
}

impl From<ValidationError> for ErrorCode {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidNamespace => ErrorCode::InvalidNamespace,
            ValidationError::InvalidMethod => ErrorCode::InvalidMethod,
            ValidationError::MissingKey => ErrorCode::KeyNameIsNull,
            ValidationError::MissingValue => ErrorCode::KeyValueIsNull,
        }
    }
}

/// Outcome of one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Response {
    /// `list`: entries sorted case-insensitively
    Entries(Vec<SettingEntry>),
    /// `get`: the stored value, if any
    Value(Option<String>),
    /// `put`: whether the store accepted the write
    Written(bool),
    /// `delete`: number of rows removed
    Deleted(u64),
    Error(ErrorCode),
}

/// Text printed for a `get` on a key the store does not have
pub const ABSENT_VALUE: &str = "null";

impl Response {
    /// Line-oriented rendering: one line per entry for `list`, exactly one otherwise
    pub fn lines(&self) -> Vec<String> {
        match self {
            Response::Entries(entries) => entries.iter().map(ToString::to_string).collect(),
            Response::Value(value) => {
                vec![value.clone().unwrap_or_else(|| ABSENT_VALUE.to_string())]
            }
            Response::Written(true) => vec!["Success".to_string()],
            Response::Written(false) => vec!["Failure (No Exception)".to_string()],
            Response::Deleted(rows) => vec![format!("Deleted {} row(s)", rows)],
            Response::Error(code) => vec![format!("ERR:{}", code)],
        }
    }

    /// Write the line rendering to `out`, newline-terminated
    pub fn write_lines<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in self.lines() {
            writeln!(out, "{}", line)?;
        }
        out.flush()
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }
}
