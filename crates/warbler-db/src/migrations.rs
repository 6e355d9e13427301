use rusqlite::Connection;
use tracing::info;

use crate::StoreError;
use warbler_types::{DEFAULT_HEADER_IMAGE_URL, DEFAULT_IMAGE_URL};

pub fn run(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(&format!(
        "
        CREATE TABLE IF NOT EXISTS users (
            id                  TEXT PRIMARY KEY,
            username            TEXT NOT NULL UNIQUE,
            email               TEXT NOT NULL UNIQUE,
            password            TEXT NOT NULL,
            image_url           TEXT NOT NULL DEFAULT '{DEFAULT_IMAGE_URL}',
            header_image_url    TEXT NOT NULL DEFAULT '{DEFAULT_HEADER_IMAGE_URL}',
            bio                 TEXT,
            location            TEXT,
            created_at          TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS messages (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            text        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_messages_user
            ON messages(user_id, created_at);

        CREATE TABLE IF NOT EXISTS follows (
            follower_id  TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            followed_id  TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at   TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (follower_id, followed_id),
            CONSTRAINT no_self_follow CHECK (follower_id <> followed_id)
        );

        CREATE INDEX IF NOT EXISTS idx_follows_followed
            ON follows(followed_id);
        ",
    ))?;

    info!("Database migrations complete");
    Ok(())
}
