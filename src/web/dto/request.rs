//! Request DTOs for the HTTP API.
//!
//! Every field is optional at the serde level so that a missing field is
//! reported by validation as a 400, not as a deserialization failure.

use serde::Deserialize;
use validator::Validate;

/// Body of `POST /api/threads/{board}`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateThreadRequest {
    #[validate(required, length(min = 1))]
    pub text: Option<String>,
    #[validate(required, length(min = 1))]
    pub delete_password: Option<String>,
}

/// Body of `DELETE /api/threads/{board}`.
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteThreadRequest {
    #[validate(required, length(min = 1))]
    pub thread_id: Option<String>,
    #[validate(required, length(min = 1))]
    pub delete_password: Option<String>,
}

/// Body of `PUT /api/threads/{board}`, and query of `GET /api/replies/{board}`.
#[derive(Debug, Deserialize, Validate)]
pub struct ThreadIdRequest {
    #[validate(required, length(min = 1))]
    pub thread_id: Option<String>,
}

/// Body of `POST /api/replies/{board}`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReplyRequest {
    #[validate(required, length(min = 1))]
    pub thread_id: Option<String>,
    #[validate(required, length(min = 1))]
    pub text: Option<String>,
    #[validate(required, length(min = 1))]
    pub delete_password: Option<String>,
}

/// Body of `DELETE /api/replies/{board}`.
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteReplyRequest {
    #[validate(required, length(min = 1))]
    pub thread_id: Option<String>,
    #[validate(required, length(min = 1))]
    pub reply_id: Option<String>,
    #[validate(required, length(min = 1))]
    pub delete_password: Option<String>,
}

/// Body of `PUT /api/replies/{board}`.
#[derive(Debug, Deserialize, Validate)]
pub struct ReportReplyRequest {
    #[validate(required, length(min = 1))]
    pub thread_id: Option<String>,
    #[validate(required, length(min = 1))]
    pub reply_id: Option<String>,
}
