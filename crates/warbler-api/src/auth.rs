use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::error;
use uuid::Uuid;

use warbler_db::Database;
use warbler_types::api::{Claims, LoginResponse, SignupResponse};
use warbler_types::forms::{LoginForm, UserAddForm};

use crate::convert::user_response;
use crate::error::{ApiError, join_error};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(form): Json<UserAddForm>,
) -> Result<impl IntoResponse, ApiError> {
    form.validate()?;

    // Run blocking DB work off the async runtime
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        db.db.signup(
            &form.username,
            &form.email,
            &form.password,
            form.image_url.as_deref(),
        )
    })
    .await
    .map_err(join_error)??;

    let user = user_response(row)?;
    let token = create_token(&state.jwt_secret, user.id, &user.username).map_err(|e| {
        error!("token creation failed: {e}");
        ApiError::Internal
    })?;

    Ok((StatusCode::CREATED, Json(SignupResponse { user, token })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<impl IntoResponse, ApiError> {
    form.validate()?;

    // A bare 401 for unknown username and wrong password alike — the
    // response never says which part was wrong.
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.authenticate(&form.username, &form.password))
        .await
        .map_err(join_error)??
        .ok_or(ApiError::Unauthorized)?;

    let user = user_response(row)?;
    let token = create_token(&state.jwt_secret, user.id, &user.username).map_err(|e| {
        error!("token creation failed: {e}");
        ApiError::Internal
    })?;

    Ok(Json(LoginResponse { user, token }))
}

fn create_token(secret: &str, user_id: Uuid, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
