//! Thread and reply models for msgboard.
//!
//! A [`Thread`] owns its [`Reply`] records by value. Replies are only ever
//! created, found, or changed through their parent thread.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text a reply carries after it has been deleted.
pub const DELETED_REPLY_TEXT: &str = "[deleted]";

/// Reply entity embedded in a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    /// Unique reply ID.
    pub id: Uuid,
    /// Reply body. Replaced by [`DELETED_REPLY_TEXT`] on deletion.
    pub text: String,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Whether the reply has been reported.
    pub reported: bool,
    /// Argon2 hash of the delete password.
    pub delete_password: String,
}

impl Reply {
    /// Create a new reply with a freshly generated ID.
    pub fn new(
        text: impl Into<String>,
        delete_password_hash: impl Into<String>,
        created_on: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            created_on,
            reported: false,
            delete_password: delete_password_hash.into(),
        }
    }

    /// Overwrite the body with the deletion marker.
    pub fn mark_deleted(&mut self) {
        self.text = DELETED_REPLY_TEXT.to_string();
    }

    /// Whether the reply has been deleted.
    pub fn is_deleted(&self) -> bool {
        self.text == DELETED_REPLY_TEXT
    }

    /// Flag the reply for moderation. Reporting twice is harmless.
    pub fn report(&mut self) {
        self.reported = true;
    }
}

/// Thread entity: a top-level post on a board.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    /// Unique thread ID.
    pub id: Uuid,
    /// Board the thread was posted to.
    pub board: String,
    /// Thread body.
    pub text: String,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Last activity timestamp, used to sort threads on a board.
    pub bumped_on: DateTime<Utc>,
    /// Whether the thread has been reported.
    pub reported: bool,
    /// Argon2 hash of the delete password.
    pub delete_password: String,
    /// Replies in the order they were posted.
    pub replies: Vec<Reply>,
    /// Stored version, advanced by every successful write.
    pub version: i64,
}

impl Thread {
    /// Build a brand-new thread from creation data.
    pub fn new(new_thread: NewThread, delete_password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            board: new_thread.board,
            text: new_thread.text,
            created_on: now,
            bumped_on: now,
            reported: false,
            delete_password: delete_password_hash,
            replies: Vec::new(),
            version: 0,
        }
    }

    /// Append a reply and bump the thread to the reply's creation time.
    ///
    /// `bumped_on` never moves backwards, even if the clock does.
    pub fn add_reply(&mut self, reply: Reply) {
        if reply.created_on > self.bumped_on {
            self.bumped_on = reply.created_on;
        }
        self.replies.push(reply);
    }

    /// Find a reply by ID.
    pub fn reply(&self, reply_id: Uuid) -> Option<&Reply> {
        self.replies.iter().find(|r| r.id == reply_id)
    }

    /// Find a reply by ID for modification.
    pub fn reply_mut(&mut self, reply_id: Uuid) -> Option<&mut Reply> {
        self.replies.iter_mut().find(|r| r.id == reply_id)
    }

    /// Flag the thread for moderation. Reporting twice is harmless.
    pub fn report(&mut self) {
        self.reported = true;
    }
}

/// Data for creating a new thread.
#[derive(Debug, Clone)]
pub struct NewThread {
    /// Board to post to.
    pub board: String,
    /// Thread body.
    pub text: String,
    /// Plain-text delete password; hashed before storage.
    pub delete_password: String,
}

impl NewThread {
    /// Create a new thread with required fields.
    pub fn new(
        board: impl Into<String>,
        text: impl Into<String>,
        delete_password: impl Into<String>,
    ) -> Self {
        Self {
            board: board.into(),
            text: text.into(),
            delete_password: delete_password.into(),
        }
    }
}

/// Data for replying to a thread.
#[derive(Debug, Clone)]
pub struct NewReply {
    /// Thread being replied to.
    pub thread_id: Uuid,
    /// Reply body.
    pub text: String,
    /// Plain-text delete password; hashed before storage.
    pub delete_password: String,
}

impl NewReply {
    /// Create a new reply with required fields.
    pub fn new(
        thread_id: Uuid,
        text: impl Into<String>,
        delete_password: impl Into<String>,
    ) -> Self {
        Self {
            thread_id,
            text: text.into(),
            delete_password: delete_password.into(),
        }
    }
}
