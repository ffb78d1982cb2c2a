//! Thread handlers for the HTTP API.

use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};
use std::sync::Arc;

use crate::board::{NewThread, ThreadView};
use crate::web::dto::{
    required, CreateThreadRequest, DeleteThreadRequest, ThreadIdRequest, ValidatedPayload,
};
use crate::web::error::ApiError;
use crate::web::handlers::{parse_id, AppState};

/// POST /api/threads/:board - Post a new thread.
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    ValidatedPayload(req): ValidatedPayload<CreateThreadRequest>,
) -> Result<Redirect, ApiError> {
    let new_thread = NewThread::new(&board, required(req.text), required(req.delete_password));
    state.board_service().create_thread(new_thread).await?;

    Ok(Redirect::to(&format!("/b/{}/", urlencoding::encode(&board))))
}

/// GET /api/threads/:board - List the most recently bumped threads.
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
) -> Result<Json<Vec<ThreadView>>, ApiError> {
    let threads = state.board_service().list_threads(&board).await?;
    Ok(Json(threads))
}

/// DELETE /api/threads/:board - Delete a thread with its password.
pub async fn delete_thread(
    State(state): State<Arc<AppState>>,
    ValidatedPayload(req): ValidatedPayload<DeleteThreadRequest>,
) -> Result<&'static str, ApiError> {
    let thread_id = parse_id(&required(req.thread_id)).ok_or_else(ApiError::incorrect_password)?;

    state
        .board_service()
        .delete_thread(thread_id, &required(req.delete_password))
        .await?;

    Ok("success")
}

/// PUT /api/threads/:board - Report a thread.
pub async fn report_thread(
    State(state): State<Arc<AppState>>,
    ValidatedPayload(req): ValidatedPayload<ThreadIdRequest>,
) -> Result<&'static str, ApiError> {
    let thread_id = parse_id(&required(req.thread_id)).ok_or_else(ApiError::not_found)?;

    state.board_service().report_thread(thread_id).await?;

    Ok("reported")
}
