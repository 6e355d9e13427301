use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- JWT Claims --

/// JWT claims shared between warbler-api (token creation on signup/login) and
/// its auth middleware. Canonical definition lives here in warbler-types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user: UserResponse,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub token: String,
}

// -- Users --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub image_url: String,
    pub header_image_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
}

/// Profile page payload: the user plus their messages, newest first.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserProfileResponse {
    pub user: UserResponse,
    pub messages: Vec<MessageResponse>,
}

// -- Messages --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
