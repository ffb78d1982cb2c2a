//! Board module for msgboard.
//!
//! This module provides the message board itself:
//! - Thread and reply models, with replies owned by their thread
//! - Versioned thread storage
//! - Public projections for listings and thread pages
//! - Lifecycle operations (post, reply, report, delete)

mod service;
mod thread;
mod thread_repository;
pub mod view;

pub use service::{BoardService, DEFAULT_MAX_UPDATE_ATTEMPTS};
pub use thread::{NewReply, NewThread, Reply, Thread, DELETED_REPLY_TEXT};
pub use thread_repository::{LockedThread, ThreadRepository};
pub use view::{ReplyView, ThreadView};
