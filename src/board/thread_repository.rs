//! Thread repository for msgboard.
//!
//! Threads are stored one row each, with their replies embedded as a JSON
//! document. Every write replaces the whole thread and is conditional on the
//! version that was read. Mutations go through [`ThreadRepository::lock_for_update`],
//! which holds the database write lock from load to commit.

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, Transaction};
use uuid::Uuid;

use super::thread::{Reply, Thread};
use crate::db::DbPool;
use crate::{MsgboardError, Result};

/// Repository for thread storage.
pub struct ThreadRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ThreadRepository<'a> {
    /// Create a new ThreadRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a new thread.
    pub async fn insert(&self, thread: &Thread) -> Result<()> {
        let replies = serde_json::to_string(&thread.replies)?;

        sqlx::query(
            "INSERT INTO threads
                (id, board, text, delete_password, created_on, bumped_on, reported, replies, version)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(thread.id.to_string())
        .bind(&thread.board)
        .bind(&thread.text)
        .bind(&thread.delete_password)
        .bind(thread.created_on)
        .bind(thread.bumped_on)
        .bind(thread.reported)
        .bind(replies)
        .bind(thread.version)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Get a thread by ID.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Thread>> {
        fetch_thread(self.pool, id).await
    }

    /// Load a thread for modification, taking the database write lock first.
    ///
    /// Concurrent callers wait (up to the connection's busy timeout) until the
    /// returned [`LockedThread`] is saved or dropped. Returns None, releasing
    /// the lock, when the thread does not exist.
    pub async fn lock_for_update(&self, id: Uuid) -> Result<Option<LockedThread>> {
        let mut tx = self.pool.begin().await?;

        // A write as the first statement takes the lock before any snapshot is read.
        sqlx::query("UPDATE threads SET version = version WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        match fetch_thread(&mut *tx, id).await? {
            Some(thread) => Ok(Some(LockedThread { tx, thread })),
            None => {
                tx.rollback().await?;
                Ok(None)
            }
        }
    }

    /// List the most recently bumped threads on a board.
    pub async fn list_by_board(&self, board: &str, limit: i64) -> Result<Vec<Thread>> {
        let rows: Vec<ThreadRow> = sqlx::query_as(
            "SELECT id, board, text, delete_password, created_on, bumped_on, reported, replies, version
             FROM threads WHERE board = ? ORDER BY bumped_on DESC, rowid DESC LIMIT ?",
        )
        .bind(board)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ThreadRow::into_thread).collect()
    }

    /// Replace a stored thread with `thread`, provided nobody wrote it since it was read.
    ///
    /// Returns false when the stored version no longer matches `thread.version`
    /// (or the thread is gone).
    pub async fn update(&self, thread: &Thread) -> Result<bool> {
        write_thread(self.pool, thread).await
    }

    /// Delete a thread by ID, replies included.
    ///
    /// Returns true if a thread was deleted, false if not found.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM threads WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// A thread loaded under the database write lock.
///
/// Dropping it without calling [`LockedThread::save`] rolls back and releases
/// the lock.
pub struct LockedThread {
    tx: Transaction<'static, Sqlite>,
    /// The thread as stored when the lock was taken.
    pub thread: Thread,
}

impl LockedThread {
    /// Write the modified thread and commit, releasing the lock.
    ///
    /// Returns false, writing nothing, if the stored version moved anyway.
    pub async fn save(mut self) -> Result<bool> {
        let written = write_thread(&mut *self.tx, &self.thread).await?;
        if written {
            self.tx.commit().await?;
        } else {
            self.tx.rollback().await?;
        }
        Ok(written)
    }
}

async fn fetch_thread<'e, E>(executor: E, id: Uuid) -> Result<Option<Thread>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row: Option<ThreadRow> = sqlx::query_as(
        "SELECT id, board, text, delete_password, created_on, bumped_on, reported, replies, version
         FROM threads WHERE id = ?",
    )
    .bind(id.to_string())
    .fetch_optional(executor)
    .await?;

    row.map(ThreadRow::into_thread).transpose()
}

async fn write_thread<'e, E>(executor: E, thread: &Thread) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let replies = serde_json::to_string(&thread.replies)?;

    let result = sqlx::query(
        "UPDATE threads
         SET bumped_on = ?, reported = ?, replies = ?, version = version + 1
         WHERE id = ? AND version = ?",
    )
    .bind(thread.bumped_on)
    .bind(thread.reported)
    .bind(replies)
    .bind(thread.id.to_string())
    .bind(thread.version)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Internal struct for mapping database rows to Thread.
#[derive(sqlx::FromRow)]
struct ThreadRow {
    id: String,
    board: String,
    text: String,
    delete_password: String,
    created_on: DateTime<Utc>,
    bumped_on: DateTime<Utc>,
    reported: bool,
    replies: String,
    version: i64,
}

impl ThreadRow {
    fn into_thread(self) -> Result<Thread> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| MsgboardError::Database(format!("corrupt thread id {}: {e}", self.id)))?;
        let replies: Vec<Reply> = serde_json::from_str(&self.replies)?;

        Ok(Thread {
            id,
            board: self.board,
            text: self.text,
            created_on: self.created_on,
            bumped_on: self.bumped_on,
            reported: self.reported,
            delete_password: self.delete_password,
            replies,
            version: self.version,
        })
    }
}
