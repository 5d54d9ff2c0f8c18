//! SQLite access: schema setup and the per-request connection cache

use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{Error, Result};

const SCHEMA: &str = include_str!("schema.sql");

/// Handle to the database file. Cheap to clone; opens connections on demand.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open a new connection to the database file
    pub fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Drop and recreate all tables
    pub fn init(&self) -> Result<()> {
        let conn = self.connect()?;
        init_schema(&conn)?;
        tracing::info!("Initialized database at {}", self.path.display());
        Ok(())
    }
}

/// Run the schema script on an open connection, clearing existing data
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Request-scoped connection cache
///
/// The connection is opened on first use and reused for the rest of the
/// request. It is closed by [`RequestDb::close`] at teardown, or when the
/// cache is dropped.
#[derive(Debug)]
pub struct RequestDb {
    database: Database,
    conn: Mutex<Option<Connection>>,
}

impl RequestDb {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            conn: Mutex::new(None),
        }
    }

    /// Run `f` against the request's connection, opening it if needed
    pub fn with<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| Error::Other("database connection lock poisoned".to_string()))?;

        if guard.is_none() {
            *guard = Some(self.database.connect()?);
        }

        match guard.as_ref() {
            Some(conn) => f(conn),
            None => Err(Error::Other("database connection unavailable".to_string())),
        }
    }

    /// Whether a connection has been opened for this request
    pub fn is_open(&self) -> bool {
        self.conn.lock().map(|c| c.is_some()).unwrap_or(false)
    }

    /// Close the cached connection, if any
    pub fn close(&self) {
        let conn = match self.conn.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => return,
        };

        if let Some(conn) = conn {
            if let Err((_, e)) = conn.close() {
                tracing::warn!("Failed to close database connection: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_database() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let database = Database::new(dir.path().join("test.sqlite"));
        database.init().expect("Failed to init database");
        (dir, database)
    }

    #[test]
    fn test_init_creates_tables() {
        let (_dir, database) = temp_database();
        let conn = database.connect().expect("Failed to connect");

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('user', 'post')",
                [],
                |row| row.get(0),
            )
            .expect("Failed to query sqlite_master");
        assert_eq!(tables, 2);
    }

    #[test]
    fn test_init_clears_existing_data() {
        let (_dir, database) = temp_database();
        {
            let conn = database.connect().expect("Failed to connect");
            conn.execute(
                "INSERT INTO user (username, password) VALUES ('a', 'b')",
                [],
            )
            .expect("Failed to insert");
        }

        database.init().expect("Failed to re-init database");

        let conn = database.connect().expect("Failed to connect");
        let users: i64 = conn
            .query_row("SELECT COUNT(*) FROM user", [], |row| row.get(0))
            .expect("Failed to count users");
        assert_eq!(users, 0);
    }

    #[test]
    fn test_request_db_is_lazy() {
        let (_dir, database) = temp_database();
        let db = RequestDb::new(database);
        assert!(!db.is_open());

        db.with(|conn| Ok(conn.execute_batch("SELECT 1")?))
            .expect("Failed to query");
        assert!(db.is_open());
    }

    #[test]
    fn test_request_db_reuses_connection() {
        let (_dir, database) = temp_database();
        let db = RequestDb::new(database);

        // Temp tables are only visible on the connection that created them
        db.with(|conn| Ok(conn.execute_batch("CREATE TEMP TABLE marker (x INTEGER)")?))
            .expect("Failed to create temp table");
        let found: i64 = db
            .with(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_temp_master WHERE name = 'marker'",
                    [],
                    |row| row.get(0),
                )?)
            })
            .expect("Failed to query temp master");
        assert_eq!(found, 1);
    }

    #[test]
    fn test_request_db_close() {
        let (_dir, database) = temp_database();
        let db = RequestDb::new(database);

        db.with(|conn| Ok(conn.execute_batch("CREATE TEMP TABLE marker (x INTEGER)")?))
            .expect("Failed to create temp table");
        db.close();
        assert!(!db.is_open());

        // A fresh connection no longer sees the temp table
        let found: i64 = db
            .with(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_temp_master WHERE name = 'marker'",
                    [],
                    |row| row.get(0),
                )?)
            })
            .expect("Failed to query temp master");
        assert_eq!(found, 0);
    }
}
