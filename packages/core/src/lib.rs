// ABOUTME: Core types, traits, and utilities for setkit
// ABOUTME: Namespaces, permissions and setting entries shared by every package

pub mod constants;
pub mod error;
pub mod types;
pub mod utils;

// Re-export main types
pub use types::{Namespace, Permission, SettingEntry};

// Re-export constants
pub use constants::{database_file, setkit_dir, DATABASE_FILE_NAME};

// Re-export errors
pub use error::CoreError;

// Re-export utilities
pub use utils::{compare_chars_ignore_case, compare_ignore_case};
