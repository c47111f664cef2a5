//! Core types shared across sqlstep facilities
//!
//! - **Correlation**: `RunId` tagging every event of one migrate/status run
//! - **Schema constants**: canonical log field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RunId;
