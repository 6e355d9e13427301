use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use warbler_db::StoreError;
use warbler_types::forms::FormErrors;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(FormErrors),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("internal error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": errors })),
            )
                .into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl From<FormErrors> for ApiError {
    fn from(errors: FormErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Constraint violations become form-level field errors instead of a 500,
/// so a duplicate signup reads the same as any other validation failure.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate("username") => {
                Self::Validation(FormErrors::single("username", "Username already taken."))
            }
            StoreError::Duplicate("email") => {
                Self::Validation(FormErrors::single("email", "Email already registered."))
            }
            StoreError::Duplicate("follow") => {
                Self::Validation(FormErrors::single("follow", "Already following this user."))
            }
            StoreError::Duplicate(field) => {
                Self::Validation(FormErrors::single(field, "Already exists."))
            }
            StoreError::SelfFollow => {
                Self::Validation(FormErrors::single("follow", "You cannot follow yourself."))
            }
            StoreError::NotFound => Self::NotFound,
            err => {
                error!("store error: {err}");
                Self::Internal
            }
        }
    }
}

pub(crate) fn join_error(err: tokio::task::JoinError) -> ApiError {
    error!("spawn_blocking join error: {err}");
    ApiError::Internal
}
