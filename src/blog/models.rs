//! Blog post models and queries

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::auth::User;
use crate::error::{Error, Result};

const POST_COLUMNS: &str = "SELECT p.id, title, body, created, author_id, username
     FROM post p JOIN user u ON p.author_id = u.id";

/// A post joined with its author's username
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub created: NaiveDateTime,
    pub author_id: i64,
    pub username: String,
}

impl Post {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            body: row.get("body")?,
            created: row.get("created")?,
            author_id: row.get("author_id")?,
            username: row.get("username")?,
        })
    }

    /// All posts, newest first
    pub fn all(conn: &Connection) -> Result<Vec<Post>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY created DESC, p.id DESC", POST_COLUMNS))?;
        let posts = stmt
            .query_map([], Self::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(posts)
    }

    pub fn find(conn: &Connection, id: i64) -> Result<Option<Post>> {
        let post = conn
            .query_row(
                &format!("{} WHERE p.id = ?1", POST_COLUMNS),
                [id],
                Self::from_row,
            )
            .optional()?;
        Ok(post)
    }

    /// Insert a post and return its id
    pub fn create(conn: &Connection, title: &str, body: &str, author_id: i64) -> Result<i64> {
        conn.execute(
            "INSERT INTO post (title, body, author_id) VALUES (?1, ?2, ?3)",
            params![title, body, author_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(conn: &Connection, id: i64, title: &str, body: &str) -> Result<()> {
        conn.execute(
            "UPDATE post SET title = ?1, body = ?2 WHERE id = ?3",
            params![title, body, id],
        )?;
        Ok(())
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        conn.execute("DELETE FROM post WHERE id = ?1", [id])?;
        Ok(())
    }
}

/// Load a post, optionally checking that `user` wrote it
///
/// A missing post is a 404, someone else's post a 403.
pub fn get_post(conn: &Connection, id: i64, user: &User, check_author: bool) -> Result<Post> {
    let post = Post::find(conn, id)?
        .ok_or_else(|| Error::NotFound(format!("Post id {} doesn't exist.", id)))?;

    if check_author && post.author_id != user.id {
        return Err(Error::Forbidden);
    }

    Ok(post)
}

/// Create / update form
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl PostForm {
    pub fn validation_error(&self) -> Option<&'static str> {
        if self.title.is_empty() {
            Some("Title is required.")
        } else {
            None
        }
    }
}
