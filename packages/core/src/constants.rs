use std::env;
use std::path::PathBuf;

/// File name of the SQLite settings database inside the setkit directory
pub const DATABASE_FILE_NAME: &str = "settings.db";

/// Get the path to the setkit directory (~/.setkit)
pub fn setkit_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".setkit")
    } else {
        // Fall back to dirs crate, then to the working directory
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".setkit")
    }
}

/// Get the path to the default settings database (~/.setkit/settings.db)
pub fn database_file() -> PathBuf {
    setkit_dir().join(DATABASE_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_file_lives_in_setkit_dir() {
        let db = database_file();
        assert_eq!(db.file_name().unwrap(), DATABASE_FILE_NAME);
        assert_eq!(db.parent().unwrap(), setkit_dir());
        assert!(setkit_dir().ends_with(".setkit"));
    }
}
