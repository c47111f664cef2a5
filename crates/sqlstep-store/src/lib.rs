//! sqlstep store - SQLite-backed migration tracking and apply orchestration
//!
//! Provides:
//! - connection helpers (`db`)
//! - `MigrationSource`: discovers scripts in a directory
//! - `MigrationStore`: owns the tracking table and the transactional apply
//! - `MigrationRunner`: computes the pending set and applies it in order
//! - status reporting and scaffolding of new migration files

pub mod db;
pub mod errors;
pub mod migrations;

pub use errors::Result;
pub use migrations::{
    MigrationRunner, MigrationSource, MigrationStore, NoopObserver, RunObserver, RunOutcome,
};
