/// Database row types — these map directly to SQLite rows.
/// Distinct from warbler-types API models to keep the DB layer independent.

#[derive(Debug)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_url: String,
    pub header_image_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub created_at: String,
}

#[derive(Debug)]
pub struct MessageRow {
    pub id: String,
    pub user_id: String,
    pub text: String,
    pub created_at: String,
}

/// Fields a user may change about their own profile. The confirmation
/// password is checked by the caller before this ever reaches the store.
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    pub image_url: Option<String>,
    pub header_image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}
