//! Explicit configuration for the migration components
//!
//! Paths are passed in at construction rather than read from process-wide
//! constants, so tests can point every component at a temporary location.

use std::path::{Path, PathBuf};

pub const DEFAULT_DB_PATH: &str = "database/app.db";
pub const DEFAULT_MIGRATIONS_DIR: &str = "migrations";
pub const DEFAULT_EXTENSION: &str = "sql";
pub const DEFAULT_SEPARATOR: char = '_';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateConfig {
    pub db_path: PathBuf,
    pub migrations_dir: PathBuf,
    /// Script extension without the leading dot
    pub extension: String,
    /// Character separating the version prefix from the rest of the filename
    pub separator: char,
}

impl MigrateConfig {
    pub fn new(db_path: impl Into<PathBuf>, migrations_dir: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            migrations_dir: migrations_dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            separator: DEFAULT_SEPARATOR,
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn migrations_dir(&self) -> &Path {
        &self.migrations_dir
    }
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH, DEFAULT_MIGRATIONS_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MigrateConfig::default();
        assert_eq!(config.db_path(), Path::new("database/app.db"));
        assert_eq!(config.migrations_dir(), Path::new("migrations"));
        assert_eq!(config.extension, "sql");
        assert_eq!(config.separator, '_');
    }

    #[test]
    fn test_extension_leading_dot_is_stripped() {
        let config = MigrateConfig::default().with_extension(".pgsql");
        assert_eq!(config.extension, "pgsql");
    }
}
