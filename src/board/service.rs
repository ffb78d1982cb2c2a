//! Board service for msgboard.
//!
//! This module provides the thread and reply lifecycle operations on top of
//! [`ThreadRepository`]. Every mutation of an existing thread is a
//! read-modify-write done under the database write lock, so writers to the
//! same thread take turns instead of failing.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{hash_password, password_matches};
use crate::db::Database;
use crate::{MsgboardError, Result};

use super::thread::{NewReply, NewThread, Reply, Thread};
use super::thread_repository::ThreadRepository;
use super::view::{list_view, ThreadView, MAX_LISTED_THREADS};

/// Default number of attempts for a thread update whose version check fails.
pub const DEFAULT_MAX_UPDATE_ATTEMPTS: u32 = 8;

fn thread_not_found() -> MsgboardError {
    MsgboardError::NotFound("thread".to_string())
}

fn reply_not_found() -> MsgboardError {
    MsgboardError::NotFound("reply".to_string())
}

/// Service for thread and reply operations.
pub struct BoardService<'a> {
    db: &'a Database,
    max_update_attempts: u32,
}

impl<'a> BoardService<'a> {
    /// Create a new BoardService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            max_update_attempts: DEFAULT_MAX_UPDATE_ATTEMPTS,
        }
    }

    /// Set how many times an update is attempted when its version check fails.
    pub fn with_max_update_attempts(mut self, attempts: u32) -> Self {
        self.max_update_attempts = attempts.max(1);
        self
    }

    /// Post a new thread to a board.
    pub async fn create_thread(&self, new_thread: NewThread) -> Result<Thread> {
        let hash = hash_password(&new_thread.delete_password)?;
        let thread = Thread::new(new_thread, hash, Utc::now());

        ThreadRepository::new(self.db.pool()).insert(&thread).await?;

        info!(thread_id = %thread.id, board = %thread.board, "Thread created");
        Ok(thread)
    }

    /// List the most recently bumped threads of a board.
    pub async fn list_threads(&self, board: &str) -> Result<Vec<ThreadView>> {
        let threads = ThreadRepository::new(self.db.pool())
            .list_by_board(board, MAX_LISTED_THREADS as i64)
            .await?;
        Ok(list_view(&threads))
    }

    /// Get a thread with all of its replies.
    pub async fn get_thread(&self, thread_id: Uuid) -> Result<ThreadView> {
        let thread = ThreadRepository::new(self.db.pool())
            .get_by_id(thread_id)
            .await?
            .ok_or_else(thread_not_found)?;
        Ok(ThreadView::detail(&thread))
    }

    /// Delete a thread and all of its replies.
    ///
    /// An unknown thread and a wrong password both yield
    /// [`MsgboardError::IncorrectPassword`].
    pub async fn delete_thread(&self, thread_id: Uuid, password: &str) -> Result<()> {
        let repo = ThreadRepository::new(self.db.pool());

        let thread = repo
            .get_by_id(thread_id)
            .await?
            .ok_or(MsgboardError::IncorrectPassword)?;

        if !password_matches(password, &thread.delete_password) {
            debug!(thread_id = %thread_id, "Thread delete rejected");
            return Err(MsgboardError::IncorrectPassword);
        }

        // Lost a race with another delete of the same thread.
        if !repo.delete(thread_id).await? {
            return Err(MsgboardError::IncorrectPassword);
        }

        info!(thread_id = %thread_id, board = %thread.board, "Thread deleted");
        Ok(())
    }

    /// Flag a thread for moderation.
    pub async fn report_thread(&self, thread_id: Uuid) -> Result<()> {
        self.modify_thread(thread_id, |thread| {
            thread.report();
            Ok(())
        })
        .await?;

        info!(thread_id = %thread_id, "Thread reported");
        Ok(())
    }

    /// Append a reply to a thread and bump it.
    pub async fn create_reply(&self, new_reply: NewReply) -> Result<Reply> {
        let hash = hash_password(&new_reply.delete_password)?;
        let thread_id = new_reply.thread_id;

        let reply = self
            .modify_thread(thread_id, |thread| {
                let reply = Reply::new(new_reply.text.clone(), hash.clone(), Utc::now());
                thread.add_reply(reply.clone());
                Ok(reply)
            })
            .await?;

        info!(thread_id = %thread_id, reply_id = %reply.id, "Reply created");
        Ok(reply)
    }

    /// Replace a reply's text with the deletion marker.
    ///
    /// Unlike [`BoardService::delete_thread`], an unknown thread or reply is
    /// reported as not found. The password is checked before the write lock is
    /// taken.
    pub async fn delete_reply(&self, thread_id: Uuid, reply_id: Uuid, password: &str) -> Result<()> {
        let thread = ThreadRepository::new(self.db.pool())
            .get_by_id(thread_id)
            .await?
            .ok_or_else(thread_not_found)?;
        let reply = thread.reply(reply_id).ok_or_else(reply_not_found)?;

        if !password_matches(password, &reply.delete_password) {
            debug!(thread_id = %thread_id, reply_id = %reply_id, "Reply delete rejected");
            return Err(MsgboardError::IncorrectPassword);
        }

        self.modify_thread(thread_id, |thread| {
            let reply = thread.reply_mut(reply_id).ok_or_else(reply_not_found)?;
            if reply.is_deleted() {
                debug!(thread_id = %thread_id, reply_id = %reply_id, "Reply already deleted");
            }
            reply.mark_deleted();
            Ok(())
        })
        .await?;

        info!(thread_id = %thread_id, reply_id = %reply_id, "Reply deleted");
        Ok(())
    }

    /// Flag a reply for moderation.
    pub async fn report_reply(&self, thread_id: Uuid, reply_id: Uuid) -> Result<()> {
        self.modify_thread(thread_id, |thread| {
            thread
                .reply_mut(reply_id)
                .ok_or_else(reply_not_found)?
                .report();
            Ok(())
        })
        .await?;

        info!(thread_id = %thread_id, reply_id = %reply_id, "Reply reported");
        Ok(())
    }

    /// Load a thread under the write lock, apply `change`, and save it.
    ///
    /// An error from `change` aborts without writing anything. The version
    /// check on save is a backstop; a failed one reloads and re-applies.
    async fn modify_thread<T, F>(&self, thread_id: Uuid, mut change: F) -> Result<T>
    where
        F: FnMut(&mut Thread) -> Result<T>,
    {
        let repo = ThreadRepository::new(self.db.pool());

        for attempt in 1..=self.max_update_attempts {
            let mut locked = repo
                .lock_for_update(thread_id)
                .await?
                .ok_or_else(thread_not_found)?;

            let value = change(&mut locked.thread)?;

            if locked.save().await? {
                return Ok(value);
            }
            debug!(thread_id = %thread_id, attempt, "Thread version moved under lock, retrying");
        }

        warn!(
            thread_id = %thread_id,
            attempts = self.max_update_attempts,
            "Giving up on thread update"
        );
        Err(MsgboardError::Contention(thread_id.to_string()))
    }
}
