//! API handlers for the message board.

pub mod reply;
pub mod thread;

pub use reply::*;
pub use thread::*;

use std::sync::Arc;

use uuid::Uuid;

use crate::board::{BoardService, DEFAULT_MAX_UPDATE_ATTEMPTS};
use crate::db::Database;

/// Shared state for every handler.
pub struct AppState {
    /// Database opened at startup.
    pub db: Arc<Database>,
    /// Attempts allowed for a thread update whose version check fails.
    pub max_update_attempts: u32,
}

impl AppState {
    /// Create a new AppState with the default retry policy.
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            max_update_attempts: DEFAULT_MAX_UPDATE_ATTEMPTS,
        }
    }

    /// Set the attempts allowed for a thread update whose version check fails.
    pub fn with_max_update_attempts(mut self, attempts: u32) -> Self {
        self.max_update_attempts = attempts;
        self
    }

    /// Board service bound to this state's database.
    pub fn board_service(&self) -> BoardService<'_> {
        BoardService::new(&self.db).with_max_update_attempts(self.max_update_attempts)
    }
}

/// Parse an entity id from a request. A malformed id refers to nothing.
pub(crate) fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
