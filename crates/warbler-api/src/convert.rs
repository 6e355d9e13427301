//! Row → API response conversion. Rows carry TEXT ids and timestamps as
//! stored; a row that fails to parse is corrupt and surfaces as a 500
//! rather than a silently defaulted field.

use tracing::warn;
use uuid::Uuid;

use warbler_db::models::{MessageRow, UserRow};
use warbler_types::api::{MessageResponse, UserResponse};

use crate::error::ApiError;

pub(crate) fn user_response(row: UserRow) -> Result<UserResponse, ApiError> {
    Ok(UserResponse {
        id: parse_id(&row.id)?,
        username: row.username,
        email: row.email,
        image_url: row.image_url,
        header_image_url: row.header_image_url,
        bio: row.bio,
        location: row.location,
    })
}

pub(crate) fn message_response(row: MessageRow) -> Result<MessageResponse, ApiError> {
    Ok(MessageResponse {
        id: parse_id(&row.id)?,
        user_id: parse_id(&row.user_id)?,
        text: row.text,
        timestamp: parse_timestamp(&row.id, &row.created_at)?,
    })
}

pub(crate) fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    id.parse().map_err(|e| {
        warn!("Corrupt id '{}': {}", id, e);
        ApiError::Internal
    })
}

fn parse_timestamp(row_id: &str, value: &str) -> Result<chrono::DateTime<chrono::Utc>, ApiError> {
    value
        .parse::<chrono::DateTime<chrono::Utc>>()
        .or_else(|_| {
            // SQLite's datetime('now') default stores "YYYY-MM-DD HH:MM:SS"
            // without a timezone. Parse as naive UTC and convert.
            chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .map(|ndt| ndt.and_utc())
        })
        .map_err(|e| {
            warn!("Corrupt created_at '{}' on row '{}': {}", value, row_id, e);
            ApiError::Internal
        })
}
