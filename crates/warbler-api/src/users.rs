use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use warbler_db::models::ProfileUpdate;
use warbler_types::api::{Claims, UserProfileResponse};
use warbler_types::forms::UserEditForm;

use crate::auth::AppState;
use crate::convert::{message_response, user_response};
use crate::error::{ApiError, join_error};
use crate::redirect_found;

pub async fn list_users(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_users())
        .await
        .map_err(join_error)??;

    let users = rows
        .into_iter()
        .map(user_response)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(users))
}

/// Profile page: the user plus their messages, newest first.
pub async fn show_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let uid = user_id.to_string();

    let (user_row, message_rows) = tokio::task::spawn_blocking(move || {
        let user = db.db.get_user_by_id(&uid)?.ok_or(ApiError::NotFound)?;
        let messages = db.db.messages_of(&uid)?;
        Ok::<_, ApiError>((user, messages))
    })
    .await
    .map_err(join_error)??;

    let messages = message_rows
        .into_iter()
        .map(message_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(UserProfileResponse {
        user: user_response(user_row)?,
        messages,
    }))
}

pub async fn following(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let uid = user_id.to_string();

    let rows = tokio::task::spawn_blocking(move || {
        if db.db.get_user_by_id(&uid)?.is_none() {
            return Err(ApiError::NotFound);
        }
        Ok(db.db.following_of(&uid)?)
    })
    .await
    .map_err(join_error)??;

    let users = rows
        .into_iter()
        .map(user_response)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(users))
}

pub async fn followers(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let uid = user_id.to_string();

    let rows = tokio::task::spawn_blocking(move || {
        if db.db.get_user_by_id(&uid)?.is_none() {
            return Err(ApiError::NotFound);
        }
        Ok(db.db.followers_of(&uid)?)
    })
    .await
    .map_err(join_error)??;

    let users = rows
        .into_iter()
        .map(user_response)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(users))
}

pub async fn follow(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let me = claims.sub.to_string();
    let them = user_id.to_string();

    tokio::task::spawn_blocking(move || db.db.follow(&me, &them))
        .await
        .map_err(join_error)??;

    Ok(redirect_found(format!("/users/{}/following", claims.sub)))
}

pub async fn stop_following(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let me = claims.sub.to_string();
    let them = user_id.to_string();

    tokio::task::spawn_blocking(move || db.db.unfollow(&me, &them))
        .await
        .map_err(join_error)??;

    Ok(redirect_found(format!("/users/{}/following", claims.sub)))
}

/// Apply profile edits. The form's password re-confirms identity against
/// the current hash before anything changes.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<UserEditForm>,
) -> Result<impl IntoResponse, ApiError> {
    form.validate()?;

    let db = state.clone();
    let me = claims.sub.to_string();

    tokio::task::spawn_blocking(move || {
        let current = db.db.get_user_by_id(&me)?.ok_or(ApiError::Unauthorized)?;
        if !warbler_password::verify(&form.password, &current.password) {
            return Err(ApiError::Unauthorized);
        }

        let update = ProfileUpdate {
            username: form.username,
            email: form.email,
            image_url: form.image_url,
            header_image_url: form.header_image_url,
            bio: form.bio,
            location: form.location,
        };
        Ok(db.db.update_profile(&me, update)?)
    })
    .await
    .map_err(join_error)??;

    Ok(redirect_found(format!("/users/{}", claims.sub)))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let me = claims.sub.to_string();

    tokio::task::spawn_blocking(move || db.db.delete_user(&me))
        .await
        .map_err(join_error)??;

    Ok(redirect_found("/signup".to_string()))
}
