//! Public projections of threads and replies.
//!
//! These are the only shapes that leave the service. They carry no
//! `delete_password` or `reported` field at all.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::thread::{Reply, Thread};

/// Maximum number of threads in a board listing.
pub const MAX_LISTED_THREADS: usize = 10;

/// Maximum number of replies previewed under each listed thread.
pub const MAX_PREVIEW_REPLIES: usize = 3;

/// Public view of a reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub text: String,
    pub created_on: DateTime<Utc>,
}

impl From<&Reply> for ReplyView {
    fn from(reply: &Reply) -> Self {
        Self {
            id: reply.id,
            text: reply.text.clone(),
            created_on: reply.created_on,
        }
    }
}

/// Public view of a thread, used by both the board listing and the detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub text: String,
    pub created_on: DateTime<Utc>,
    pub bumped_on: DateTime<Utc>,
    pub replies: Vec<ReplyView>,
}

impl ThreadView {
    /// Listing entry: newest replies first, at most [`MAX_PREVIEW_REPLIES`].
    pub fn summary(thread: &Thread) -> Self {
        // Reverse first so equal timestamps still put the later reply on top.
        let mut replies: Vec<&Reply> = thread.replies.iter().rev().collect();
        replies.sort_by(|a, b| b.created_on.cmp(&a.created_on));
        replies.truncate(MAX_PREVIEW_REPLIES);

        Self::with_replies(thread, replies.into_iter().map(ReplyView::from).collect())
    }

    /// Detail page: every reply in the order it was posted.
    pub fn detail(thread: &Thread) -> Self {
        Self::with_replies(thread, thread.replies.iter().map(ReplyView::from).collect())
    }

    fn with_replies(thread: &Thread, replies: Vec<ReplyView>) -> Self {
        Self {
            id: thread.id,
            text: thread.text.clone(),
            created_on: thread.created_on,
            bumped_on: thread.bumped_on,
            replies,
        }
    }
}

/// Build a board listing: most recently bumped first, at most [`MAX_LISTED_THREADS`].
pub fn list_view(threads: &[Thread]) -> Vec<ThreadView> {
    let mut sorted: Vec<&Thread> = threads.iter().collect();
    sorted.sort_by(|a, b| b.bumped_on.cmp(&a.bumped_on));
    sorted
        .into_iter()
        .take(MAX_LISTED_THREADS)
        .map(ThreadView::summary)
        .collect()
}
