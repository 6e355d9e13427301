use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{self, AppState};
use crate::messages;
use crate::middleware::require_auth;
use crate::users;

/// Build the full application router. Everything except signup and login
/// sits behind the JWT middleware.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{user_id}", get(users::show_user))
        .route("/users/{user_id}/following", get(users::following))
        .route("/users/{user_id}/followers", get(users::followers))
        .route("/users/follow/{user_id}", post(users::follow))
        .route("/users/stop-following/{user_id}", post(users::stop_following))
        .route("/users/profile", post(users::update_profile))
        .route("/users/delete", post(users::delete_account))
        .route("/messages/new", post(messages::new_message))
        .route("/messages/{message_id}", get(messages::show_message))
        .route("/messages/{message_id}/delete", post(messages::delete_message))
        .route("/timeline", get(messages::timeline))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
