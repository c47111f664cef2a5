//! sqlstep core - domain types for versioned SQL migrations
//!
//! This crate holds everything that does not touch the database:
//! - `Version`, the validated, sortable migration identifier
//! - `MigrationFile` / `MigrationRecord` models
//! - the error facility (`MigrateError`, `SsError`, `SsErrorKind`)
//! - the structured logging facility and its macros
//! - `MigrateConfig`, the explicit configuration handed to every component

pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod version;

#[doc(hidden)]
pub use sqlstep_core_types::schema as __schema;

pub use config::MigrateConfig;
pub use errors::{MigrateError, Result, SsError, SsErrorKind};
pub use model::{MigrationFile, MigrationRecord};
pub use version::Version;
