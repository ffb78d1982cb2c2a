//! Web API module for msgboard.
//!
//! This module exposes the board operations over HTTP under `/api`, plus a
//! health check and optional static file serving.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
