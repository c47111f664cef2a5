//! Migration status report
//!
//! Merges the catalog with the tracking table by version. Never writes to the
//! database: a missing tracking table reads as no records. Listing the catalog
//! still creates the migrations directory when it is absent.

use crate::errors::Result;
use crate::migrations::checksums::compute_checksum;
use crate::migrations::source::MigrationSource;
use crate::migrations::store::MigrationStore;
use sqlstep_core::{MigrationFile, MigrationRecord, Version};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub enum MigrationStatus {
    /// Recorded and still on disk; `drifted` when the file changed since
    Applied {
        record: MigrationRecord,
        drifted: bool,
    },
    /// On disk, not yet applied
    Pending { file: MigrationFile },
    /// Recorded, but the file is gone
    Missing { record: MigrationRecord },
}

#[derive(Debug, Clone)]
pub struct StatusEntry {
    pub version: Version,
    pub status: MigrationStatus,
}

#[derive(Debug, Clone, Default)]
pub struct StatusReport {
    pub entries: Vec<StatusEntry>,
}

impl StatusReport {
    pub fn pending(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, MigrationStatus::Pending { .. }))
    }

    pub fn applied_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, MigrationStatus::Applied { .. }))
            .count()
    }

    pub fn pending_count(&self) -> usize {
        self.pending().count()
    }

    pub fn missing_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, MigrationStatus::Missing { .. }))
            .count()
    }

    pub fn drifted(&self) -> Vec<&Version> {
        self.entries
            .iter()
            .filter_map(|e| match &e.status {
                MigrationStatus::Applied { drifted: true, .. } => Some(&e.version),
                _ => None,
            })
            .collect()
    }

    pub fn is_up_to_date(&self) -> bool {
        self.pending_count() == 0
    }
}

/// Build the status report for `source` against `store`
///
/// Entries are ordered by version. Records written without a checksum are
/// never reported as drifted.
pub fn status(source: &MigrationSource, store: &MigrationStore) -> Result<StatusReport> {
    let records = if store.has_tracking_table()? {
        store.list_records()?
    } else {
        Vec::new()
    };

    let mut records: BTreeMap<Version, MigrationRecord> = records
        .into_iter()
        .map(|r| (r.version.clone(), r))
        .collect();

    let mut merged: BTreeMap<Version, MigrationStatus> = BTreeMap::new();
    for file in source.list_available()? {
        let version = file.version().clone();
        let status = match records.remove(&version) {
            Some(record) => {
                let drifted = match &record.checksum {
                    Some(recorded) => compute_checksum(file.sql()?) != *recorded,
                    None => false,
                };
                MigrationStatus::Applied { record, drifted }
            }
            None => MigrationStatus::Pending { file },
        };
        merged.insert(version, status);
    }

    for (version, record) in records {
        merged.insert(version, MigrationStatus::Missing { record });
    }

    Ok(StatusReport {
        entries: merged
            .into_iter()
            .map(|(version, status)| StatusEntry { version, status })
            .collect(),
    })
}
