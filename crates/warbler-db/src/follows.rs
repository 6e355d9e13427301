use crate::models::UserRow;
use crate::users::{USER_COLUMNS, user_from_row};
use crate::{Database, StoreError};

impl Database {
    /// Insert a follow edge from `follower_id` to `followed_id`.
    ///
    /// Self-follows are rejected outright; the `(follower, followed)` pair
    /// is unique, so following twice surfaces as `Duplicate("follow")`, and
    /// a missing target user as `NotFound` via the foreign key.
    pub fn follow(&self, follower_id: &str, followed_id: &str) -> Result<(), StoreError> {
        if follower_id == followed_id {
            return Err(StoreError::SelfFollow);
        }

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO follows (follower_id, followed_id) VALUES (?1, ?2)",
                [follower_id, followed_id],
            )
            .map_err(StoreError::from_sqlite)?;
            Ok(())
        })
    }

    /// Remove a follow edge. Removing an edge that does not exist is a
    /// no-op, so unfollow is idempotent.
    pub fn unfollow(&self, follower_id: &str, followed_id: &str) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM follows WHERE follower_id = ?1 AND followed_id = ?2",
                [follower_id, followed_id],
            )?;
            Ok(())
        })
    }

    pub fn is_following(&self, follower_id: &str, followed_id: &str) -> Result<bool, StoreError> {
        self.with_conn(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(
                     SELECT 1 FROM follows WHERE follower_id = ?1 AND followed_id = ?2
                 )",
                [follower_id, followed_id],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }

    pub fn is_followed_by(&self, user_id: &str, follower_id: &str) -> Result<bool, StoreError> {
        self.is_following(follower_id, user_id)
    }

    /// Users that `user_id` follows, ordered by username.
    pub fn following_of(&self, user_id: &str) -> Result<Vec<UserRow>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users
                 JOIN follows ON follows.followed_id = users.id
                 WHERE follows.follower_id = ?1
                 ORDER BY users.username"
            ))?;
            let rows = stmt
                .query_map([user_id], user_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Users that follow `user_id`, ordered by username.
    pub fn followers_of(&self, user_id: &str) -> Result<Vec<UserRow>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users
                 JOIN follows ON follows.follower_id = users.id
                 WHERE follows.followed_id = ?1
                 ORDER BY users.username"
            ))?;
            let rows = stmt
                .query_map([user_id], user_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}
