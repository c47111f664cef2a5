//! Migrate command
//!
//! Usage: sqlstep [migrate] [--db <PATH>] [--migrations-dir <PATH>]

use sqlstep_core::{MigrateConfig, MigrationFile, MigrationRecord, SsError};
use sqlstep_store::{MigrationRunner, MigrationSource, MigrationStore, RunObserver, RunOutcome};

/// Prints one line per step to stdout
struct ConsoleObserver;

impl RunObserver for ConsoleObserver {
    fn on_nothing_pending(&mut self) {
        println!("✓ No pending migrations");
    }

    fn on_pending(&mut self, pending: &[&MigrationFile]) {
        println!("Found {} pending migration(s)", pending.len());
    }

    fn on_attempt(&mut self, file: &MigrationFile) {
        println!("Applying migration {}: {}...", file.version(), file.name());
    }

    fn on_applied(&mut self, _file: &MigrationFile, record: &MigrationRecord) {
        println!("✓ Migration {} applied successfully", record.version);
    }

    fn on_failed(&mut self, file: &MigrationFile, error: &SsError) {
        println!("✗ Error applying migration {}: {}", file.version(), error.message());
    }

    fn on_finished(&mut self, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::NothingPending => {}
            RunOutcome::Done { applied } => {
                println!();
                println!("✓ All {} migration(s) applied successfully", applied.len());
            }
            RunOutcome::Failed {
                applied, failed, ..
            } => {
                println!();
                println!(
                    "✗ Stopped at migration {} ({} applied before the failure)",
                    failed,
                    applied.len()
                );
            }
        }
    }
}

/// Execute the full migrate cycle
pub fn execute(config: &MigrateConfig) -> Result<(), Box<dyn std::error::Error>> {
    let source = MigrationSource::from_config(config);
    // Fail on the directory before opening the database
    source.ensure_directory()?;

    let store = MigrationStore::open(config.db_path())?;
    let mut runner = MigrationRunner::new(source, store).with_observer(Box::new(ConsoleObserver));
    tracing::debug!(run_id = %runner.run_id(), db = %config.db_path().display(), "starting run");

    match runner.run()? {
        RunOutcome::Failed { error, .. } => Err(error.into()),
        _ => Ok(()),
    }
}
