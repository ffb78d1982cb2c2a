//! Reply handlers for the HTTP API.
//!
//! The board path segment is only used to build redirects. Replies are
//! addressed by their thread id alone.

use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};
use std::sync::Arc;

use crate::board::{NewReply, ThreadView};
use crate::web::dto::{
    required, CreateReplyRequest, DeleteReplyRequest, ReportReplyRequest, ThreadIdRequest,
    ValidatedPayload, ValidatedQuery,
};
use crate::web::error::ApiError;
use crate::web::handlers::{parse_id, AppState};

/// POST /api/replies/:board - Reply to a thread.
pub async fn create_reply(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    ValidatedPayload(req): ValidatedPayload<CreateReplyRequest>,
) -> Result<Redirect, ApiError> {
    let thread_id = parse_id(&required(req.thread_id)).ok_or_else(ApiError::not_found)?;

    let new_reply = NewReply::new(thread_id, required(req.text), required(req.delete_password));
    state.board_service().create_reply(new_reply).await?;

    Ok(Redirect::to(&format!(
        "/b/{}/{}",
        urlencoding::encode(&board),
        thread_id
    )))
}

/// GET /api/replies/:board?thread_id= - Get a thread with all replies.
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<ThreadIdRequest>,
) -> Result<Json<ThreadView>, ApiError> {
    let thread_id = parse_id(&required(query.thread_id)).ok_or_else(ApiError::not_found)?;

    let thread = state.board_service().get_thread(thread_id).await?;

    Ok(Json(thread))
}

/// DELETE /api/replies/:board - Delete a reply with its password.
pub async fn delete_reply(
    State(state): State<Arc<AppState>>,
    ValidatedPayload(req): ValidatedPayload<DeleteReplyRequest>,
) -> Result<&'static str, ApiError> {
    let thread_id = parse_id(&required(req.thread_id)).ok_or_else(ApiError::not_found)?;
    let reply_id = parse_id(&required(req.reply_id)).ok_or_else(ApiError::not_found)?;

    state
        .board_service()
        .delete_reply(thread_id, reply_id, &required(req.delete_password))
        .await?;

    Ok("success")
}

/// PUT /api/replies/:board - Report a reply.
pub async fn report_reply(
    State(state): State<Arc<AppState>>,
    ValidatedPayload(req): ValidatedPayload<ReportReplyRequest>,
) -> Result<&'static str, ApiError> {
    let thread_id = parse_id(&required(req.thread_id)).ok_or_else(ApiError::not_found)?;
    let reply_id = parse_id(&required(req.reply_id)).ok_or_else(ApiError::not_found)?;

    state
        .board_service()
        .report_reply(thread_id, reply_id)
        .await?;

    Ok("reported")
}
