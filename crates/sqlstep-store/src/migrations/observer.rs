//! Progress hooks for a migration run
//!
//! The runner reports each step through a `RunObserver`. Every method has an
//! empty default so implementors only override what they display.

use crate::migrations::runner::RunOutcome;
use sqlstep_core::{MigrationFile, MigrationRecord, SsError};

pub trait RunObserver {
    /// No migration is pending; the run ends here
    fn on_nothing_pending(&mut self) {}

    /// The pending set, in the order it will be applied
    fn on_pending(&mut self, _pending: &[&MigrationFile]) {}

    /// About to apply `file`
    fn on_attempt(&mut self, _file: &MigrationFile) {}

    /// `file` was applied and recorded
    fn on_applied(&mut self, _file: &MigrationFile, _record: &MigrationRecord) {}

    /// `file` failed and was rolled back; no further migrations will run
    fn on_failed(&mut self, _file: &MigrationFile, _error: &SsError) {}

    /// The run reached a terminal state
    fn on_finished(&mut self, _outcome: &RunOutcome) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
