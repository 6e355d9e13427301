use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A UNIQUE constraint rejected the write; the field names which one.
    #[error("duplicate {0}")]
    Duplicate(&'static str),

    #[error("a user cannot follow themselves")]
    SelfFollow,

    #[error("row not found")]
    NotFound,

    #[error("database lock poisoned")]
    LockPoisoned,

    #[error("password hashing failed: {0}")]
    Password(#[from] warbler_password::PasswordError),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    /// Translate SQLite constraint failures into typed store errors so the
    /// API layer can turn them into form-level messages instead of a 500.
    pub(crate) fn from_sqlite(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, Some(msg)) = &err {
            if code.code == rusqlite::ErrorCode::ConstraintViolation {
                if msg.contains("users.username") {
                    return Self::Duplicate("username");
                }
                if msg.contains("users.email") {
                    return Self::Duplicate("email");
                }
                if msg.contains("follows.follower_id") {
                    return Self::Duplicate("follow");
                }
                if msg.contains("no_self_follow") {
                    return Self::SelfFollow;
                }
                if msg.contains("FOREIGN KEY") {
                    return Self::NotFound;
                }
            }
        }
        Self::Sqlite(err)
    }
}
