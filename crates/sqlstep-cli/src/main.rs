//! sqlstep CLI
//!
//! Applies pending SQL migrations to a SQLite database.
//! Exit status is 0 on success (including "nothing pending") and 1 on failure.

use clap::{Args, Parser, Subcommand, ValueEnum};
use sqlstep_core::logging_facility::{self, Profile};
use sqlstep_core::MigrateConfig;
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "sqlstep")]
#[command(about = "Apply versioned SQL migrations exactly once", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// SQLite database file
    #[arg(long, global = true, env = "SQLSTEP_DB", default_value = sqlstep_core::config::DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// Directory holding <version>_<name>.sql scripts
    #[arg(
        long,
        global = true,
        env = "SQLSTEP_MIGRATIONS_DIR",
        default_value = sqlstep_core::config::DEFAULT_MIGRATIONS_DIR
    )]
    pub migrations_dir: PathBuf,

    /// Log output format (logs go to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl GlobalArgs {
    pub fn config(&self) -> MigrateConfig {
        MigrateConfig::new(&self.db, &self.migrations_dir)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply all pending migrations (default)
    Migrate,
    /// Show applied, pending and missing migrations
    Status,
    /// Create the next migration file
    New(commands::new::NewArgs),
}

fn main() {
    let cli = Cli::parse();

    logging_facility::init(match cli.global.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let config = cli.global.config();
    let result = match cli.command.unwrap_or(Commands::Migrate) {
        Commands::Migrate => commands::migrate::execute(&config),
        Commands::Status => commands::status::execute(&config),
        Commands::New(args) => commands::new::execute(&config, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
