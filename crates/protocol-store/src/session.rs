//! Store session.
//!
//! One session is opened per run and passed into every stage. The
//! connection is released when the session is dropped or closed.

use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{Result, StoreError, check_identifier};

const SCHEMA: &str = include_str!("../resources/schema.sql");

pub struct StoreSession {
    conn: Connection,
}

impl StoreSession {
    /// Open (or create) a database file and make sure the tables exist.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "store session opened");
        Self::init(conn)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(SCHEMA)?;
        debug!("schema ensured");
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Execute a generated SQL script as-is.
    pub fn apply_script(&self, script: &str) -> Result<()> {
        self.conn.execute_batch(script)?;
        Ok(())
    }

    /// Number of rows in a table.
    pub fn count_rows(&self, table: &str) -> Result<i64> {
        check_identifier(table)?;
        let count = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get::<_, i64>(0)
            })?;
        Ok(count)
    }

    /// Close the connection, reporting any error the drop would swallow.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, error)| StoreError::Sqlite(error))
    }
}
