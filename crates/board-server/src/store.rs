//! Post persistence backed by `SQLite`.
//!
//! The `posts` table has columns: `id`, `content`, `posted_by`,
//! `tracking_cookie`, `created_at`, `updated_at`. Timestamps are stored as
//! RFC 3339 UTC text. The schema is created on open.
//!
//! Access is serialized through an `Arc<Mutex<Connection>>`; every call takes
//! the lock for the duration of one short statement and the lock is never
//! held across an `.await`.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

/// Errors from the post store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying `SQLite` failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// A bulletin board post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Autoincrement primary key.
    pub id: i64,
    /// Message body, stored verbatim; escaping happens at render time.
    pub content: String,
    /// User name of the author, used for delete authorization.
    pub posted_by: String,
    /// Tracking identity active when the post was created (audit only).
    pub tracking_cookie: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Durable post store backed by `SQLite`.
#[derive(Clone)]
pub struct PostStore {
    conn: Arc<Mutex<Connection>>,
}

impl PostStore {
    /// Opens (creating if needed) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be created.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens an in-memory database. Used by tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS posts (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                content         TEXT NOT NULL,
                posted_by       TEXT NOT NULL,
                tracking_cookie TEXT NOT NULL,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            );",
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Inserts a new post and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create(
        &self,
        content: &str,
        posted_by: &str,
        tracking_cookie: &str,
    ) -> Result<Post, StoreError> {
        let now = Utc::now();
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        conn.execute(
            "INSERT INTO posts (content, posted_by, tracking_cookie, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![content, posted_by, tracking_cookie, now, now],
        )?;
        let id = conn.last_insert_rowid();
        Ok(Post {
            id,
            content: content.to_string(),
            posted_by: posted_by.to_string(),
            tracking_cookie: tracking_cookie.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns all posts, newest id first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_all_desc(&self) -> Result<Vec<Post>, StoreError> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stmt = conn.prepare(
            "SELECT id, content, posted_by, tracking_cookie, created_at, updated_at
             FROM posts ORDER BY id DESC",
        )?;
        let posts = stmt
            .query_map([], row_to_post)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    /// Looks up a post by primary key.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_by_id(&self, id: i64) -> Result<Option<Post>, StoreError> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let post = conn
            .query_row(
                "SELECT id, content, posted_by, tracking_cookie, created_at, updated_at
                 FROM posts WHERE id = ?1",
                params![id],
                row_to_post,
            )
            .optional()?;
        Ok(post)
    }

    /// Deletes a post by primary key. Returns `true` if a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let removed = conn.execute("DELETE FROM posts WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}

fn row_to_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        content: row.get(1)?,
        posted_by: row.get(2)?,
        tracking_cookie: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_find_round_trips() {
        let store = PostStore::open_in_memory().unwrap();
        let created = store.create("hello", "alice", "1_abc").unwrap();

        let found = store.find_by_id(created.id).unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[test]
    fn find_all_is_newest_first() {
        let store = PostStore::open_in_memory().unwrap();
        let first = store.create("first", "alice", "t").unwrap();
        let second = store.create("second", "bob", "t").unwrap();

        let all = store.find_all_desc().unwrap();
        assert_eq!(
            all.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );
    }

    #[test]
    fn delete_removes_the_row() {
        let store = PostStore::open_in_memory().unwrap();
        let post = store.create("gone soon", "alice", "t").unwrap();

        assert!(store.delete(post.id).unwrap());
        assert!(store.find_by_id(post.id).unwrap().is_none());
        // Deleting again reports nothing removed.
        assert!(!store.delete(post.id).unwrap());
    }

    #[test]
    fn missing_id_is_none() {
        let store = PostStore::open_in_memory().unwrap();
        assert!(store.find_by_id(9999).unwrap().is_none());
    }

    #[test]
    fn schema_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.db");

        let post_id = {
            let store = PostStore::open(&path).unwrap();
            store.create("durable", "alice", "t").unwrap().id
        };

        let reopened = PostStore::open(&path).unwrap();
        let post = reopened.find_by_id(post_id).unwrap().unwrap();
        assert_eq!(post.content, "durable");
    }
}
