pub mod auth;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod router;
pub mod users;

mod convert;

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;
pub use router::router;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

/// 302 redirect. The original surface documents `302 Found` for form-style
/// POSTs, and axum's `Redirect` only offers 303/307/308, so the response is
/// assembled directly.
pub(crate) fn redirect_found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
