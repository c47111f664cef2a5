use thiserror::Error;

/// Result type alias using MigrateError
pub type Result<T> = std::result::Result<T, MigrateError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable code that tests, logs and the CLI can rely on
/// regardless of how the human-readable message is worded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SsErrorKind {
    // Validation
    InvalidInput,
    InvalidVersion,
    DuplicateVersion,
    AlreadyExists,

    // Filesystem
    Directory,
    Io,

    // Database
    ScriptExecution,
    Persistence,
}

impl SsErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            SsErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            SsErrorKind::InvalidVersion => "ERR_INVALID_VERSION",
            SsErrorKind::DuplicateVersion => "ERR_DUPLICATE_VERSION",
            SsErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            SsErrorKind::Directory => "ERR_DIRECTORY",
            SsErrorKind::Io => "ERR_IO",
            SsErrorKind::ScriptExecution => "ERR_SCRIPT_EXECUTION",
            SsErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus optional context (operation, migration
/// version, filesystem path) for programmatic handling and reporting.
#[derive(Debug, Clone)]
pub struct SsError {
    kind: SsErrorKind,
    op: Option<String>,
    version: Option<String>,
    path: Option<String>,
    message: String,
}

impl SsError {
    pub fn new(kind: SsErrorKind) -> Self {
        Self {
            kind,
            op: None,
            version: None,
            path: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the migration version the error relates to
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Add the filesystem path the error relates to
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> SsErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for SsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(version) = &self.version {
            write!(f, " (version: {})", version)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for SsError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for migration operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigrateError {
    /// Migrations directory could not be created or read
    #[error("Migrations directory {path} is not usable: {reason}")]
    DirectoryError { path: String, reason: String },

    /// A version string failed validation
    #[error("Invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    /// Two migration files, or a file and an existing record, share a version
    #[error("Duplicate migration version: {version}")]
    DuplicateVersion { version: String },

    /// The SQL script of a migration failed; its transaction was rolled back
    #[error("Migration {version} failed: {reason}")]
    ScriptExecution { version: String, reason: String },

    /// Target file already exists (scaffolding refuses to overwrite)
    #[error("Already exists: {path}")]
    AlreadyExists { path: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },
}

impl From<MigrateError> for SsError {
    fn from(err: MigrateError) -> Self {
        match err {
            MigrateError::DirectoryError { path, reason } => SsError::new(SsErrorKind::Directory)
                .with_op("ensure_directory")
                .with_path(path)
                .with_message(reason),

            MigrateError::InvalidVersion { input, reason } => {
                SsError::new(SsErrorKind::InvalidVersion)
                    .with_op("parse_version")
                    .with_version(input)
                    .with_message(reason)
            }

            MigrateError::DuplicateVersion { version } => {
                SsError::new(SsErrorKind::DuplicateVersion)
                    .with_version(version)
                    .with_message("Version is already taken")
            }

            MigrateError::ScriptExecution { version, reason } => {
                SsError::new(SsErrorKind::ScriptExecution)
                    .with_op("apply_migration")
                    .with_version(version)
                    .with_message(reason)
            }

            MigrateError::AlreadyExists { path } => SsError::new(SsErrorKind::AlreadyExists)
                .with_path(path)
                .with_message("Refusing to overwrite existing file"),

            MigrateError::InvalidInput { reason } => {
                SsError::new(SsErrorKind::InvalidInput).with_message(reason)
            }

            MigrateError::Io { message } => SsError::new(SsErrorKind::Io).with_message(message),

            MigrateError::Persistence { message } => {
                SsError::new(SsErrorKind::Persistence).with_message(message)
            }
        }
    }
}

impl From<std::io::Error> for MigrateError {
    fn from(err: std::io::Error) -> Self {
        MigrateError::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes_are_stable() {
        let cases = [
            (SsErrorKind::Directory, "ERR_DIRECTORY"),
            (SsErrorKind::ScriptExecution, "ERR_SCRIPT_EXECUTION"),
            (SsErrorKind::DuplicateVersion, "ERR_DUPLICATE_VERSION"),
            (SsErrorKind::InvalidVersion, "ERR_INVALID_VERSION"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_display_includes_version_and_message() {
        let err = SsError::new(SsErrorKind::ScriptExecution)
            .with_op("apply_migration")
            .with_version("0002")
            .with_message("near \"CREAT\": syntax error");

        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_SCRIPT_EXECUTION]"));
        assert!(rendered.contains("apply_migration"));
        assert!(rendered.contains("syntax error"));
        assert!(rendered.contains("(version: 0002)"));
    }
}
