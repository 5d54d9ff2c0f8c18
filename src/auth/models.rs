//! Authentication models

use rusqlite::{Connection, ErrorCode, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A registered user
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// bcrypt hash, never rendered
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            password_hash: row.get("password")?,
        })
    }

    /// Load a user by id
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<User>> {
        let user = conn
            .query_row(
                "SELECT id, username, password FROM user WHERE id = ?1",
                [id],
                Self::from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Load a user by username
    pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
        let user = conn
            .query_row(
                "SELECT id, username, password FROM user WHERE username = ?1",
                [username],
                Self::from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Insert a user and return its id
    ///
    /// A taken username surfaces as a unique constraint violation, see
    /// [`is_unique_violation`].
    pub fn create(conn: &Connection, username: &str, password_hash: &str) -> Result<i64> {
        conn.execute(
            "INSERT INTO user (username, password) VALUES (?1, ?2)",
            [username, password_hash],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

/// Whether a database error was caused by a UNIQUE constraint
pub fn is_unique_violation(err: &Error) -> bool {
    matches!(
        err,
        Error::Database(rusqlite::Error::SqliteFailure(e, _))
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Login / registration form
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    /// First problem with a registration attempt, if any
    pub fn registration_error(&self) -> Option<&'static str> {
        if self.username.is_empty() {
            Some("Username is required.")
        } else if self.password.is_empty() {
            Some("Password is required.")
        } else {
            None
        }
    }
}
