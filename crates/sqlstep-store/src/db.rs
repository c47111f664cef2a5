//! Database connection management

use crate::errors::{from_rusqlite, io_error, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open (creating if needed) a SQLite database at the given path
///
/// The parent directory is created when missing so a fresh checkout can run
/// migrations without any preparation. The journal mode is left untouched.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_error("create_db_dir", e))?;
    }
    let conn = Connection::open(path).map_err(from_rusqlite)?;
    stock_foreign_keys(&conn)?;
    Ok(conn)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(from_rusqlite)?;
    stock_foreign_keys(&conn)?;
    Ok(conn)
}

/// Foreign key enforcement off, as in stock SQLite
///
/// The bundled build enables enforcement by default. Scripts run inside a
/// transaction where `PRAGMA foreign_keys` is a no-op, so the setting has to
/// be right before the first apply or table rebuilds cascade into children.
fn stock_foreign_keys(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", false)
        .map_err(from_rusqlite)
}
