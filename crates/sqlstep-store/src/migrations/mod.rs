//! Migration framework
//!
//! Provides:
//! - filesystem discovery of versioned scripts (`source`)
//! - the tracking table and transactional apply (`store`)
//! - ordered, fail-fast application of pending scripts (`runner`)
//! - applied/pending/missing/drift reporting (`status`)
//! - scaffolding of the next migration file (`scaffold`)

mod checksums;
mod observer;
mod runner;
mod scaffold;
mod source;
mod status;
mod store;

pub use checksums::compute_checksum;
pub use observer::{NoopObserver, RunObserver};
pub use runner::{MigrationRunner, RunOutcome};
pub use scaffold::{new_migration, slugify};
pub use source::MigrationSource;
pub use status::{status, MigrationStatus, StatusEntry, StatusReport};
pub use store::{MigrationStore, TRACKING_TABLE};
