//! Migration tracking table
//!
//! `MigrationStore` owns the database handle for a run and is the only writer
//! of the tracking table. Records are insert-only.

use crate::db;
use crate::errors::{from_rusqlite, record_error, script_error, Result};
use crate::migrations::checksums::compute_checksum;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection};
use sqlstep_core::{MigrationRecord, Version};
use std::path::Path;

/// Name of the tracking table
pub const TRACKING_TABLE: &str = "migrations";

/// Persisted migration history
///
/// Not safe for concurrent use against the same database from several
/// processes; callers serialize runs externally.
pub struct MigrationStore {
    conn: Connection,
}

impl MigrationStore {
    /// Wrap an already-open connection
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open the database file at `path`, creating it if needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        db::open(path).map(Self::new)
    }

    pub fn open_in_memory() -> Result<Self> {
        db::open_in_memory().map(Self::new)
    }

    /// Read access to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create the tracking table if it does not exist
    pub fn init(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS migrations (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    version TEXT NOT NULL UNIQUE,
                    name TEXT NOT NULL,
                    applied_at TEXT NOT NULL,
                    checksum TEXT
                )",
                [],
            )
            .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Whether the tracking table has been created yet
    pub fn has_tracking_table(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [TRACKING_TABLE],
                |row| row.get(0),
            )
            .map_err(from_rusqlite)?;
        Ok(count > 0)
    }

    /// Versions already applied, ascending
    pub fn list_applied(&self) -> Result<Vec<Version>> {
        Ok(self
            .list_records()?
            .into_iter()
            .map(|record| record.version)
            .collect())
    }

    /// Full applied records, ascending by version
    ///
    /// Rows whose version is not a valid `Version` (written by other tooling)
    /// are skipped with a warning rather than failing the whole read.
    pub fn list_records(&self) -> Result<Vec<MigrationRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT version, name, applied_at, checksum FROM migrations ORDER BY version",
            )
            .map_err(from_rusqlite)?;

        let rows: Vec<(String, String, String, Option<String>)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(rows
            .into_iter()
            .filter_map(|(raw, name, applied_at, checksum)| match Version::parse(&raw) {
                Ok(version) => Some(MigrationRecord {
                    version,
                    name,
                    applied_at,
                    checksum,
                }),
                Err(err) => {
                    tracing::warn!(version = %raw, error = %err, "skipping unrecognized tracking row");
                    None
                }
            })
            .collect())
    }

    /// Run `sql` and record `version` as one atomic unit
    ///
    /// The script and the bookkeeping insert share a transaction. Any failure
    /// drops the transaction uncommitted, which rolls back both, so the
    /// database is left as it was before the call.
    ///
    /// Scripts must not open or commit transactions of their own.
    ///
    /// # Errors
    ///
    /// - `ScriptExecution` if the script fails
    /// - `DuplicateVersion` if `version` is already recorded
    /// - `Persistence` if the transaction cannot be opened or committed
    pub fn apply(&mut self, version: &Version, name: &str, sql: &str) -> Result<MigrationRecord> {
        let tx = self.conn.transaction().map_err(from_rusqlite)?;

        tx.execute_batch(sql).map_err(|e| script_error(version, e))?;

        let record = MigrationRecord {
            version: version.clone(),
            name: name.to_string(),
            applied_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            checksum: Some(compute_checksum(sql)),
        };

        tx.execute(
            "INSERT INTO migrations (version, name, applied_at, checksum) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.version.as_str(),
                record.name,
                record.applied_at,
                record.checksum
            ],
        )
        .map_err(|e| record_error(version, e))?;

        tx.commit().map_err(from_rusqlite)?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlstep_core::SsErrorKind;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn table_exists(store: &MigrationStore, table: &str) -> bool {
        store
            .connection()
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type='table' AND name = ?",
                [table],
                |_| Ok(true),
            )
            .unwrap_or(false)
    }

    #[test]
    fn test_init_is_idempotent() {
        let store = MigrationStore::open_in_memory().unwrap();
        store.init().unwrap();
        store.init().unwrap();
        assert!(table_exists(&store, TRACKING_TABLE));
        assert!(store.list_applied().unwrap().is_empty());
    }

    #[test]
    fn test_apply_records_and_executes() {
        let mut store = MigrationStore::open_in_memory().unwrap();
        store.init().unwrap();

        let record = store
            .apply(&v("0001"), "0001_users", "CREATE TABLE users (id INTEGER);")
            .unwrap();

        assert_eq!(record.version, v("0001"));
        assert!(!record.applied_at.is_empty());
        assert_eq!(record.checksum.as_deref().map(str::len), Some(64));
        assert!(table_exists(&store, "users"));
        assert_eq!(store.list_applied().unwrap(), vec![v("0001")]);
    }

    #[test]
    fn test_failed_script_rolls_back_everything() {
        let mut store = MigrationStore::open_in_memory().unwrap();
        store.init().unwrap();

        let err = store
            .apply(
                &v("0001"),
                "0001_broken",
                "CREATE TABLE half (id INTEGER); CREATE TABLEX nope;",
            )
            .unwrap_err();

        assert_eq!(err.kind(), SsErrorKind::ScriptExecution);
        assert_eq!(err.version(), Some("0001"));
        assert!(!table_exists(&store, "half"));
        assert!(store.list_applied().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_version_rolls_back_script() {
        let mut store = MigrationStore::open_in_memory().unwrap();
        store.init().unwrap();
        store
            .apply(&v("0001"), "0001_a", "CREATE TABLE a (id INTEGER);")
            .unwrap();

        let err = store
            .apply(&v("0001"), "0001_b", "CREATE TABLE b (id INTEGER);")
            .unwrap_err();

        assert_eq!(err.kind(), SsErrorKind::DuplicateVersion);
        assert!(!table_exists(&store, "b"));

        let records = store.list_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "0001_a");
    }

    #[test]
    fn test_list_applied_is_sorted_by_version() {
        let mut store = MigrationStore::open_in_memory().unwrap();
        store.init().unwrap();
        for version in ["0003", "0001", "0002"] {
            store.apply(&v(version), version, "").unwrap();
        }

        assert_eq!(
            store.list_applied().unwrap(),
            vec![v("0001"), v("0002"), v("0003")]
        );
    }

    #[test]
    fn test_has_tracking_table_before_and_after_init() {
        let store = MigrationStore::open_in_memory().unwrap();
        assert!(!store.has_tracking_table().unwrap());
        store.init().unwrap();
        assert!(store.has_tracking_table().unwrap());
    }

    #[test]
    fn test_foreign_row_with_unparseable_version_is_skipped() {
        let mut store = MigrationStore::open_in_memory().unwrap();
        store.init().unwrap();
        store
            .connection()
            .execute(
                "INSERT INTO migrations (version, name, applied_at) VALUES ('1 a', 'legacy', 'then')",
                [],
            )
            .unwrap();
        store.apply(&v("0001"), "0001_a", "").unwrap();

        assert_eq!(store.list_applied().unwrap(), vec![v("0001")]);
    }
}
