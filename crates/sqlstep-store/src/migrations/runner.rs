//! Migration runner
//!
//! Computes the pending set (available minus applied, in filename order) and
//! applies it one migration at a time, stopping at the first failure.
//!
//! ```text
//! START -> INITIALIZED -> NOTHING_PENDING
//!                      -> APPLYING(0) -> ... -> APPLYING(n-1) -> DONE
//!                                    \-> FAILED
//! ```

use crate::errors::Result;
use crate::migrations::observer::{NoopObserver, RunObserver};
use crate::migrations::source::MigrationSource;
use crate::migrations::store::MigrationStore;
use sqlstep_core::{log_op_end, log_op_error, log_op_start, SsError, Version};
use sqlstep_core_types::RunId;
use std::collections::HashSet;
use std::time::Instant;

/// Terminal state of a run
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Every available migration was already applied
    NothingPending,
    /// All pending migrations were applied, in this order
    Done { applied: Vec<Version> },
    /// `failed` was rolled back; `applied` holds the ones committed before it
    Failed {
        applied: Vec<Version>,
        failed: Version,
        error: SsError,
    },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, RunOutcome::Failed { .. })
    }

    /// Versions committed during this run
    pub fn applied(&self) -> &[Version] {
        match self {
            RunOutcome::NothingPending => &[],
            RunOutcome::Done { applied } | RunOutcome::Failed { applied, .. } => applied,
        }
    }
}

/// Orchestrates one migrate cycle over a source and a store
///
/// The runner never touches the database directly; every read and write goes
/// through `MigrationStore`. Dropping the runner drops the store and with it
/// the connection.
pub struct MigrationRunner {
    source: MigrationSource,
    store: MigrationStore,
    observer: Box<dyn RunObserver>,
    run_id: RunId,
}

impl MigrationRunner {
    pub fn new(source: MigrationSource, store: MigrationStore) -> Self {
        Self {
            source,
            store,
            observer: Box::new(NoopObserver),
            run_id: RunId::new(),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// Run the full migrate cycle
    ///
    /// A failing migration is not an `Err`: it ends the run with
    /// `RunOutcome::Failed`, after rolling that migration back and without
    /// attempting any later one.
    ///
    /// # Errors
    ///
    /// Errors raised before any migration is attempted: the directory cannot
    /// be prepared (`Directory`), the catalog is invalid (`InvalidVersion`,
    /// `DuplicateVersion`), or the tracking table cannot be read
    /// (`Persistence`).
    pub fn run(&mut self) -> Result<RunOutcome> {
        let span = tracing::info_span!("migrate_run", run_id = %self.run_id);
        let _guard = span.enter();

        let start = Instant::now();
        log_op_start!("migrate_run", dir = %self.source.dir().display());

        let outcome = match self.run_inner() {
            Ok(outcome) => outcome,
            Err(err) => {
                log_op_error!(
                    "migrate_run",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                return Err(err);
            }
        };

        match &outcome {
            RunOutcome::Failed { failed, error, .. } => {
                log_op_error!(
                    "migrate_run",
                    error.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    version = failed.as_str()
                );
            }
            _ => {
                log_op_end!(
                    "migrate_run",
                    duration_ms = start.elapsed().as_millis() as u64,
                    applied_len = outcome.applied().len()
                );
            }
        }

        self.observer.on_finished(&outcome);
        Ok(outcome)
    }

    fn run_inner(&mut self) -> Result<RunOutcome> {
        self.store.init()?;

        let applied: HashSet<Version> = self.store.list_applied()?.into_iter().collect();
        let available = self.source.list_available()?;

        let pending: Vec<_> = available
            .iter()
            .filter(|file| !applied.contains(file.version()))
            .collect();

        if pending.is_empty() {
            tracing::info!(applied_len = applied.len(), "nothing to do");
            self.observer.on_nothing_pending();
            return Ok(RunOutcome::NothingPending);
        }

        tracing::info!(pending_len = pending.len(), "pending migrations found");
        self.observer.on_pending(&pending);

        let mut done = Vec::with_capacity(pending.len());
        for file in pending {
            self.observer.on_attempt(file);

            let start = Instant::now();
            log_op_start!("apply_migration", version = file.version().as_str());

            let result = file
                .sql()
                .map_err(SsError::from)
                .and_then(|sql| self.store.apply(file.version(), file.name(), sql));

            match result {
                Ok(record) => {
                    log_op_end!(
                        "apply_migration",
                        duration_ms = start.elapsed().as_millis() as u64,
                        version = file.version().as_str()
                    );
                    self.observer.on_applied(file, &record);
                    done.push(record.version);
                }
                Err(error) => {
                    let error = error.with_version(file.version().as_str());
                    log_op_error!(
                        "apply_migration",
                        error.clone(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        version = file.version().as_str()
                    );
                    self.observer.on_failed(file, &error);
                    return Ok(RunOutcome::Failed {
                        applied: done,
                        failed: file.version().clone(),
                        error,
                    });
                }
            }
        }

        Ok(RunOutcome::Done { applied: done })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn runner_for(dir: &std::path::Path) -> MigrationRunner {
        MigrationRunner::new(
            MigrationSource::new(dir),
            MigrationStore::open_in_memory().unwrap(),
        )
    }

    #[test]
    fn test_empty_directory_is_nothing_pending() {
        let tmp = TempDir::new().unwrap();
        let outcome = runner_for(tmp.path()).run().unwrap();
        assert!(matches!(outcome, RunOutcome::NothingPending));
        assert!(outcome.is_success());
    }

    #[test]
    fn test_outcome_applied_accessor() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("0001_a.sql"), "CREATE TABLE a (id INTEGER);").unwrap();

        let outcome = runner_for(tmp.path()).run().unwrap();
        assert_eq!(outcome.applied(), &[Version::parse("0001").unwrap()]);
    }

    #[test]
    fn test_unreadable_script_fails_at_that_version() {
        let tmp = TempDir::new().unwrap();
        // Not valid UTF-8, so reading it as a script fails
        fs::write(tmp.path().join("0001_bin.sql"), [0xff, 0xfe, 0x00]).unwrap();

        let outcome = runner_for(tmp.path()).run().unwrap();
        match outcome {
            RunOutcome::Failed { failed, error, applied } => {
                assert_eq!(failed.as_str(), "0001");
                assert_eq!(error.kind(), sqlstep_core::SsErrorKind::Io);
                assert!(applied.is_empty());
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
