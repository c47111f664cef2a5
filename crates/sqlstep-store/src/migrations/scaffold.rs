//! Scaffolding of new migration files

use crate::errors::{io_error, Result};
use crate::migrations::source::MigrationSource;
use sqlstep_core::MigrateError;
use std::io::Write;
use std::path::PathBuf;

const DEFAULT_WIDTH: usize = 4;

/// Lowercase `name`, collapsing every run of non-alphanumerics into `_`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_end_matches('_').to_string()
}

/// Create an empty script for the next version and return its path
///
/// The next version is one past the highest purely numeric version present,
/// padded to the widest existing version (4 digits for an empty directory).
///
/// # Errors
///
/// - `InvalidInput` if `name` has no alphanumeric characters
/// - `AlreadyExists` if the target file is already there
/// - whatever `list_available` reports for a broken catalog
pub fn new_migration(source: &MigrationSource, name: &str) -> Result<PathBuf> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(MigrateError::InvalidInput {
            reason: format!("migration name {:?} has no usable characters", name),
        }
        .into());
    }

    let files = source.list_available()?;
    let width = files
        .iter()
        .map(|f| f.version().width())
        .max()
        .unwrap_or(DEFAULT_WIDTH);
    let next = files
        .iter()
        .filter_map(|f| f.version().sequence_number())
        .max()
        .map_or(1, |n| n + 1);

    let filename = format!(
        "{:0width$}{}{}.{}",
        next,
        source.separator(),
        slug,
        source.extension(),
        width = width
    );
    let path = source.dir().join(&filename);

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                MigrateError::AlreadyExists {
                    path: path.display().to_string(),
                }
                .into()
            } else {
                io_error("new_migration", e)
            }
        })?;
    writeln!(file, "-- {}", filename).map_err(|e| io_error("new_migration", e))?;

    tracing::info!(path = %path.display(), "created migration file");
    Ok(path)
}
