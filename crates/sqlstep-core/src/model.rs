//! Migration models
//!
//! - `MigrationFile`: a script discovered on disk, content loaded on demand
//! - `MigrationRecord`: a row of the tracking table (immutable once written)

use crate::errors::{MigrateError, Result};
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::path::{Path, PathBuf};

/// A migration script found in the migrations directory
#[derive(Debug, Clone)]
pub struct MigrationFile {
    version: Version,
    name: String,
    filename: String,
    path: PathBuf,
    sql: OnceCell<String>,
}

impl MigrationFile {
    /// Build a catalog entry from a path, if the filename looks like a migration
    ///
    /// Returns `None` for files that are not migrations (wrong extension, or
    /// not starting with a digit). Returns `Some(Err(..))` when the filename
    /// matches the pattern but its version prefix fails validation.
    ///
    /// The version is the file stem up to the first `separator` (the whole
    /// stem when there is none); the name is the filename minus its extension.
    pub fn from_path(path: &Path, extension: &str, separator: char) -> Option<Result<Self>> {
        let filename = path.file_name()?.to_str()?;
        let suffix = format!(".{}", extension);
        let stem = filename.strip_suffix(suffix.as_str())?;

        if !stem.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }

        let prefix = stem.split(separator).next().unwrap_or(stem);
        Some(Version::parse(prefix).map(|version| Self {
            version,
            name: stem.to_string(),
            filename: filename.to_string(),
            path: path.to_path_buf(),
            sql: OnceCell::new(),
        }))
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Script content, read from disk on first access
    ///
    /// # Errors
    ///
    /// Returns `MigrateError::Io` if the file cannot be read.
    pub fn sql(&self) -> Result<&str> {
        if let Some(sql) = self.sql.get() {
            return Ok(sql);
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| MigrateError::Io {
            message: format!("Failed to read {}: {}", self.path.display(), e),
        })?;
        Ok(self.sql.get_or_init(|| content))
    }

    /// Whether the script content has been read yet
    pub fn is_loaded(&self) -> bool {
        self.sql.get().is_some()
    }
}

/// An applied migration as persisted in the tracking table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub version: Version,
    pub name: String,
    /// RFC 3339 timestamp of the apply
    pub applied_at: String,
    /// SHA-256 of the script at apply time; absent for rows written by older tooling
    pub checksum: Option<String>,
}
