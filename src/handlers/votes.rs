use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use serde_json::{json, Value};

use super::AppState;
use crate::auth::Identity;
use crate::error::CoreError;
use crate::validate::VotePayload;

/// POST /api/polls/:id/vote - cast a vote (anonymous allowed, one per
/// authenticated voter)
pub async fn cast(
    State(service): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(payload): Json<VotePayload>,
) -> Result<Json<Value>, CoreError> {
    let vote = service.cast_vote(&identity, &id, &payload).await?;
    Ok(Json(json!({ "success": true, "data": vote })))
}
