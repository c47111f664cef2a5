//! Error helpers for sqlstep-store
//!
//! Driver and filesystem failures are first expressed as `MigrateError`
//! variants, then lifted into the core `SsError` facility.

use sqlstep_core::errors::{MigrateError, SsError};
use sqlstep_core::Version;
use std::path::Path;

/// Result type alias using SsError
pub type Result<T> = std::result::Result<T, SsError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> SsError {
    SsError::from(MigrateError::Persistence {
        message: err.to_string(),
    })
    .with_op("sqlite")
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> SsError {
    SsError::from(MigrateError::from(err)).with_op(operation)
}

/// The migrations directory could not be created or listed
pub fn directory_error(path: &Path, err: std::io::Error) -> SsError {
    MigrateError::DirectoryError {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
    .into()
}

/// A migration script failed to execute
pub fn script_error(version: &Version, err: rusqlite::Error) -> SsError {
    MigrateError::ScriptExecution {
        version: version.to_string(),
        reason: err.to_string(),
    }
    .into()
}

/// Map a failure of the bookkeeping insert
///
/// The only constraint the insert can trip is the unique index on `version`.
pub fn record_error(version: &Version, err: rusqlite::Error) -> SsError {
    if is_constraint_violation(&err) {
        SsError::from(MigrateError::DuplicateVersion {
            version: version.to_string(),
        })
        .with_op("record_migration")
    } else {
        from_rusqlite(err).with_version(version.as_str())
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlstep_core::SsErrorKind;

    #[test]
    fn test_directory_error_keeps_path_and_reason() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = directory_error(Path::new("/ro/migrations"), io);

        assert_eq!(err.kind(), SsErrorKind::Directory);
        assert_eq!(err.op(), Some("ensure_directory"));
        assert_eq!(err.path(), Some("/ro/migrations"));
        assert!(err.message().contains("denied"));
    }

    #[test]
    fn test_io_error_overrides_op() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = io_error("new_migration", io);

        assert_eq!(err.code(), "ERR_IO");
        assert_eq!(err.op(), Some("new_migration"));
    }

    #[test]
    fn test_rusqlite_failure_is_persistence() {
        let err = from_rusqlite(rusqlite::Error::InvalidQuery);
        assert_eq!(err.kind(), SsErrorKind::Persistence);
        assert_eq!(err.op(), Some("sqlite"));
    }
}
