//! New migration command
//!
//! Usage: sqlstep new <NAME>

use clap::Args;
use sqlstep_core::MigrateConfig;
use sqlstep_store::migrations::new_migration;
use sqlstep_store::MigrationSource;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Human-readable name, turned into the filename slug
    pub name: String,
}

pub fn execute(config: &MigrateConfig, args: NewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let path = new_migration(&MigrationSource::from_config(config), &args.name)?;
    println!("Created {}", path.display());
    Ok(())
}
