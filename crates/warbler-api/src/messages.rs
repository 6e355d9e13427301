use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use warbler_types::api::Claims;
use warbler_types::forms::MessageForm;

use crate::auth::AppState;
use crate::convert::message_response;
use crate::error::{ApiError, join_error};
use crate::redirect_found;

#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    100
}

/// Create a message owned by the authenticated user. The timestamp is the
/// creation time; on success the original surface redirects to the
/// author's profile.
pub async fn new_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<MessageForm>,
) -> Result<impl IntoResponse, ApiError> {
    form.validate()?;

    let db = state.clone();
    let me = claims.sub.to_string();
    tokio::task::spawn_blocking(move || db.db.insert_message(&me, &form.text, None))
        .await
        .map_err(join_error)??;

    Ok(redirect_found(format!("/users/{}", claims.sub)))
}

pub async fn show_message(
    State(state): State<AppState>,
    Path(message_id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let mid = message_id.to_string();

    let row = tokio::task::spawn_blocking(move || db.db.get_message(&mid))
        .await
        .map_err(join_error)??
        .ok_or(ApiError::NotFound)?;

    Ok(Json(message_response(row)?))
}

/// Delete a message. Only its owner may do this; anyone else gets a 403
/// and the row stays put.
pub async fn delete_message(
    State(state): State<AppState>,
    Path(message_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let me = claims.sub.to_string();
    let mid = message_id.to_string();

    tokio::task::spawn_blocking(move || {
        let row = db.db.get_message(&mid)?.ok_or(ApiError::NotFound)?;
        if row.user_id != me {
            return Err(ApiError::Forbidden);
        }
        Ok(db.db.delete_message(&mid)?)
    })
    .await
    .map_err(join_error)??;

    Ok(redirect_found(format!("/users/{}", claims.sub)))
}

/// Home timeline: recent messages by the authenticated user and everyone
/// they follow, newest first.
pub async fn timeline(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let me = claims.sub.to_string();
    let limit = query.limit.min(200);

    let rows = tokio::task::spawn_blocking(move || db.db.timeline_for(&me, limit))
        .await
        .map_err(join_error)??;

    let messages = rows
        .into_iter()
        .map(message_response)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(messages))
}
