//! Migration discovery
//!
//! Lists `<version><sep><name>.<ext>` files from the migrations directory,
//! sorted by filename. Script content is not read here.

use crate::errors::{directory_error, Result};
use sqlstep_core::{MigrateConfig, MigrateError, MigrationFile};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct MigrationSource {
    dir: PathBuf,
    extension: String,
    separator: char,
}

impl MigrationSource {
    /// Source over `dir` using the default `.sql` extension and `_` separator
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::from_config(&MigrateConfig::new("", dir))
    }

    pub fn from_config(config: &MigrateConfig) -> Self {
        Self {
            dir: config.migrations_dir.clone(),
            extension: config.extension.clone(),
            separator: config.separator,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// Create the migrations directory if it is missing
    ///
    /// Returns `true` when the directory was created by this call. A missing
    /// directory is a fresh project, not an error.
    ///
    /// # Errors
    ///
    /// `Directory` if the directory cannot be created.
    pub fn ensure_directory(&self) -> Result<bool> {
        if self.dir.is_dir() {
            return Ok(false);
        }
        match std::fs::create_dir_all(&self.dir) {
            Ok(()) => {
                tracing::info!(dir = %self.dir.display(), "created migrations directory");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && self.dir.is_dir() => {
                Ok(false)
            }
            Err(e) => Err(directory_error(&self.dir, e)),
        }
    }

    /// All migration files, ascending by filename
    ///
    /// Files that do not start with a digit or lack the script extension are
    /// skipped silently, as are directories.
    ///
    /// # Errors
    ///
    /// - `Directory` if the directory cannot be created or listed
    /// - `InvalidVersion` if a matching filename has a malformed version prefix
    /// - `DuplicateVersion` if two files share a version
    pub fn list_available(&self) -> Result<Vec<MigrationFile>> {
        self.ensure_directory()?;

        let entries = std::fs::read_dir(&self.dir).map_err(|e| directory_error(&self.dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| directory_error(&self.dir, e))?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(parsed) = MigrationFile::from_path(&path, &self.extension, self.separator) {
                files.push(parsed?);
            }
        }

        files.sort_by(|a, b| a.filename().cmp(b.filename()));

        let mut seen = HashSet::new();
        for file in &files {
            if !seen.insert(file.version()) {
                return Err(MigrateError::DuplicateVersion {
                    version: file.version().to_string(),
                }
                .into());
            }
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlstep_core::SsErrorKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory_is_created_and_empty() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("migrations");
        let source = MigrationSource::new(&dir);

        assert!(source.list_available().unwrap().is_empty());
        assert!(dir.is_dir());
        assert!(!source.ensure_directory().unwrap());
    }

    #[test]
    fn test_ensure_directory_reports_creation() {
        let tmp = TempDir::new().unwrap();
        let source = MigrationSource::new(tmp.path().join("a").join("b"));
        assert!(source.ensure_directory().unwrap());
        assert!(!source.ensure_directory().unwrap());
    }

    #[test]
    fn test_directory_blocked_by_file_is_directory_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("migrations");
        fs::write(&blocker, "not a dir").unwrap();

        let err = MigrationSource::new(&blocker).ensure_directory().unwrap_err();
        assert_eq!(err.kind(), SsErrorKind::Directory);
    }

    #[test]
    fn test_lists_sorted_and_ignores_noise() {
        let tmp = TempDir::new().unwrap();
        for name in [
            "0003_c.sql",
            "0001_a.sql",
            "README.md",
            "draft.sql",
            "0002_b.sql",
            "0004_d.sql.orig",
        ] {
            fs::write(tmp.path().join(name), "").unwrap();
        }
        fs::create_dir(tmp.path().join("0005_dir.sql")).unwrap();

        let files = MigrationSource::new(tmp.path()).list_available().unwrap();
        let names: Vec<_> = files.iter().map(|f| f.filename()).collect();
        assert_eq!(names, vec!["0001_a.sql", "0002_b.sql", "0003_c.sql"]);
    }

    #[test]
    fn test_duplicate_versions_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("0001_a.sql"), "").unwrap();
        fs::write(tmp.path().join("0001_b.sql"), "").unwrap();

        let err = MigrationSource::new(tmp.path()).list_available().unwrap_err();
        assert_eq!(err.kind(), SsErrorKind::DuplicateVersion);
        assert_eq!(err.version(), Some("0001"));
    }

    #[test]
    fn test_custom_extension_and_separator() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("0001-init.pgsql"), "").unwrap();
        fs::write(tmp.path().join("0002_ignored.sql"), "").unwrap();

        let config = MigrateConfig::new("unused.db", tmp.path())
            .with_extension("pgsql")
            .with_separator('-');
        let files = MigrationSource::from_config(&config).list_available().unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].version().as_str(), "0001");
        assert_eq!(files[0].name(), "0001-init");
    }
}
