//! Status command
//!
//! Usage: sqlstep status
//!
//! Does not create the database file or the tracking table. A missing
//! migrations directory is still created when the catalog is listed.

use sqlstep_core::MigrateConfig;
use sqlstep_store::migrations::{status, MigrationStatus};
use sqlstep_store::{MigrationSource, MigrationStore};

pub fn execute(config: &MigrateConfig) -> Result<(), Box<dyn std::error::Error>> {
    let source = MigrationSource::from_config(config);
    let store = if config.db_path().exists() {
        MigrationStore::open(config.db_path())?
    } else {
        MigrationStore::open_in_memory()?
    };
    let report = status(&source, &store)?;

    println!(
        "Migrations in {} against {}",
        source.dir().display(),
        config.db_path().display()
    );

    for entry in &report.entries {
        match &entry.status {
            MigrationStatus::Applied { record, drifted } => println!(
                "  [{}]  {}  {}  ({})",
                if *drifted { "drifted" } else { "applied" },
                entry.version,
                record.name,
                record.applied_at
            ),
            MigrationStatus::Pending { file } => {
                println!("  [pending]  {}  {}", entry.version, file.name())
            }
            MigrationStatus::Missing { record } => println!(
                "  [missing]  {}  {}  ({})",
                entry.version, record.name, record.applied_at
            ),
        }
    }

    println!(
        "{} applied, {} pending, {} missing, {} drifted",
        report.applied_count(),
        report.pending_count(),
        report.missing_count(),
        report.drifted().len()
    );

    Ok(())
}
