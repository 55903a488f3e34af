use rusqlite::Connection;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::errors::PipelineError;

// Embedded at compile time so the binary runs from any working directory.
const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

// Thread-local connection slot.
thread_local! {
    static DB_CONN: RefCell<Option<(PathBuf, Connection)>> = RefCell::new(None);
}

#[derive(Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Provides a mutable connection to the closure.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, PipelineError>
    where
        F: FnOnce(&mut Connection) -> Result<T, PipelineError>,
    {
        let inner_result = DB_CONN
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();
                // Re-open when a different database path is requested on this
                // thread (tests open several databases in one process).
                let reopen = match &*slot {
                    Some((p, _)) => p != &self.path,
                    None => true,
                };
                if reopen {
                    let conn = Connection::open(&self.path)
                        .map_err(|e| PipelineError::DbError(format!("Open DB failed: {e}")))?;
                    *slot = Some((self.path.clone(), conn));
                }
                let (_, conn) = slot.as_mut().unwrap();
                f(conn)
            })
            .map_err(|_| PipelineError::DbError("thread-local DB slot unavailable".into()))?;
        inner_result
    }
}

/// Initialize the tracking database from the embedded schema.
pub fn init_db(db: &Database) -> Result<(), PipelineError> {
    db.with_conn(|conn| {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| PipelineError::DbError(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })?;

    log::debug!("Tracking database ready at {}", db.path().display());
    Ok(())
}
