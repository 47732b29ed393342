use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use serde_json::{json, Value};

use super::AppState;
use crate::auth::Identity;
use crate::error::CoreError;
use crate::validate::PollPayload;

/// GET /api/polls - list all polls, newest first
pub async fn list(State(service): State<AppState>) -> Result<Json<Value>, CoreError> {
    let polls = service.list_polls().await?;
    Ok(Json(json!({ "success": true, "data": polls })))
}

/// GET /api/polls/:id - a poll with its per-option vote counts
pub async fn get(
    State(service): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, CoreError> {
    let results = service.get_poll(&id).await?;
    Ok(Json(json!({ "success": true, "data": results })))
}

/// POST /api/polls - create a poll (authenticated only)
pub async fn create(
    State(service): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<PollPayload>,
) -> Result<Json<Value>, CoreError> {
    let poll = service.create_poll(&identity, payload).await?;
    Ok(Json(json!({ "success": true, "data": poll })))
}

/// PUT /api/polls/:id - update question/options (owner only)
pub async fn update(
    State(service): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(payload): Json<PollPayload>,
) -> Result<Json<Value>, CoreError> {
    let poll = service.update_poll(&identity, &id, payload).await?;
    Ok(Json(json!({ "success": true, "data": poll })))
}

/// DELETE /api/polls/:id - delete a poll (owner, or administrator override)
pub async fn delete(
    State(service): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<Value>, CoreError> {
    service.delete_poll(&identity, &id).await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": id } })))
}
