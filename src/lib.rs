//! msgboard - anonymous message board backend
//!
//! Boards hold threads, threads hold replies. Anyone can post; a post can
//! later be deleted by whoever knows its delete password, and anyone can
//! report a post for moderation. Everything is served as a small HTTP API.

pub mod auth;
pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use auth::{hash_password, password_matches, verify_password, PasswordError};
pub use board::{
    BoardService, NewReply, NewThread, Reply, ReplyView, Thread, ThreadRepository, ThreadView,
    DELETED_REPLY_TEXT,
};
pub use config::Config;
pub use db::Database;
pub use error::{MsgboardError, Result};
pub use web::WebServer;
