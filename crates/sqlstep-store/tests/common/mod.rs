use rusqlite::Connection;
use sqlstep_core::{MigrationFile, MigrationRecord, SsError};
use sqlstep_store::{MigrationRunner, MigrationSource, MigrationStore, RunObserver, RunOutcome};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tempfile::TempDir;

/// Temp workspace with a migrations directory and a database path
pub struct Fixture {
    pub tmp: TempDir,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir_all(tmp.path().join("migrations")).unwrap();
        Self { tmp }
    }

    pub fn migrations_dir(&self) -> PathBuf {
        self.tmp.path().join("migrations")
    }

    pub fn db_path(&self) -> PathBuf {
        self.tmp.path().join("app.db")
    }

    pub fn write(&self, filename: &str, sql: &str) {
        std::fs::write(self.migrations_dir().join(filename), sql).unwrap();
    }

    pub fn runner(&self) -> MigrationRunner {
        MigrationRunner::new(
            MigrationSource::new(self.migrations_dir()),
            MigrationStore::open(self.db_path()).unwrap(),
        )
    }

    pub fn runner_with_log(&self) -> (MigrationRunner, Rc<RefCell<Vec<String>>>) {
        let observer = RecordingObserver::default();
        let log = observer.log.clone();
        (self.runner().with_observer(Box::new(observer)), log)
    }

    pub fn connection(&self) -> Connection {
        Connection::open(self.db_path()).unwrap()
    }
}

/// Observer that keeps one line per callback
#[derive(Default)]
pub struct RecordingObserver {
    pub log: Rc<RefCell<Vec<String>>>,
}

impl RunObserver for RecordingObserver {
    fn on_nothing_pending(&mut self) {
        self.log.borrow_mut().push("nothing".to_string());
    }

    fn on_pending(&mut self, pending: &[&MigrationFile]) {
        self.log
            .borrow_mut()
            .push(format!("pending {}", pending.len()));
    }

    fn on_attempt(&mut self, file: &MigrationFile) {
        self.log
            .borrow_mut()
            .push(format!("attempt {}", file.version()));
    }

    fn on_applied(&mut self, _file: &MigrationFile, record: &MigrationRecord) {
        self.log
            .borrow_mut()
            .push(format!("applied {}", record.version));
    }

    fn on_failed(&mut self, file: &MigrationFile, error: &SsError) {
        self.log
            .borrow_mut()
            .push(format!("failed {} {}", file.version(), error.code()));
    }

    fn on_finished(&mut self, outcome: &RunOutcome) {
        self.log
            .borrow_mut()
            .push(format!("finished {}", outcome.is_success()));
    }
}

#[allow(dead_code)]
pub fn table_exists(conn: &Connection, table: &str) -> bool {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type='table' AND name = ?",
        [table],
        |_| Ok(true),
    )
    .unwrap_or(false)
}

#[allow(dead_code)]
pub fn recorded_versions(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT version FROM migrations ORDER BY id")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}
