use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::MessageRow;
use crate::{Database, OptionalExt, StoreError};

impl Database {
    /// Persist a new message. The timestamp defaults to now when the caller
    /// supplies none; text is immutable after this point.
    pub fn insert_message(
        &self,
        user_id: &str,
        text: &str,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<MessageRow, StoreError> {
        let row = MessageRow {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            text: text.to_string(),
            created_at: crate::timestamp_string(timestamp.unwrap_or_else(Utc::now)),
        };

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, user_id, text, created_at) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![row.id, row.user_id, row.text, row.created_at],
            )
            .map_err(StoreError::from_sqlite)?;
            Ok(())
        })?;

        Ok(row)
    }

    pub fn get_message(&self, id: &str) -> Result<Option<MessageRow>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, user_id, text, created_at FROM messages WHERE id = ?1")?;
            stmt.query_row([id], message_from_row).optional()
        })
    }

    /// All messages by one user, newest first.
    pub fn messages_of(&self, user_id: &str) -> Result<Vec<MessageRow>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, text, created_at FROM messages
                 WHERE user_id = ?1
                 ORDER BY created_at DESC",
            )?;
            let rows = stmt
                .query_map([user_id], message_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Recent messages by `user_id` and everyone they follow, newest first.
    pub fn timeline_for(&self, user_id: &str, limit: u32) -> Result<Vec<MessageRow>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, text, created_at FROM messages
                 WHERE user_id = ?1
                    OR user_id IN (SELECT followed_id FROM follows WHERE follower_id = ?1)
                 ORDER BY created_at DESC
                 LIMIT ?2",
            )?;
            let rows = stmt
                .query_map(rusqlite::params![user_id, limit], message_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn delete_message(&self, id: &str) -> Result<(), StoreError> {
        let affected =
            self.with_conn(|conn| Ok(conn.execute("DELETE FROM messages WHERE id = ?1", [id])?))?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

fn message_from_row(row: &rusqlite::Row) -> Result<MessageRow, rusqlite::Error> {
    Ok(MessageRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        text: row.get(2)?,
        created_at: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::{StoreError, test_db};

    #[test]
    fn message_text_and_owner_roundtrip() {
        let (_dir, db) = test_db();
        let user = db.signup("test", "test@example.com", "password", None).unwrap();

        let msg = db.insert_message(&user.id, "12test message", None).unwrap();
        assert_eq!(msg.text, "12test message");
        assert_eq!(msg.user_id, user.id);

        let stored = db.get_message(&msg.id).unwrap().unwrap();
        assert_eq!(stored.text, "12test message");
        assert_eq!(stored.user_id, user.id);
    }

    #[test]
    fn explicit_timestamp_is_kept() {
        let (_dir, db) = test_db();
        let user = db.signup("test", "test@example.com", "password", None).unwrap();

        let at = Utc.with_ymd_and_hms(2023, 5, 9, 12, 0, 0).unwrap();
        let msg = db.insert_message(&user.id, "dated", Some(at)).unwrap();

        let stored = db.get_message(&msg.id).unwrap().unwrap();
        assert_eq!(stored.created_at, "2023-05-09T12:00:00.000000Z");
    }

    #[test]
    fn missing_timestamp_defaults_to_now() {
        let (_dir, db) = test_db();
        let user = db.signup("test", "test@example.com", "password", None).unwrap();

        let before = Utc::now();
        let msg = db.insert_message(&user.id, "fresh", None).unwrap();
        let stored = db.get_message(&msg.id).unwrap().unwrap();

        let ts: chrono::DateTime<Utc> = stored.created_at.parse().unwrap();
        assert!(ts >= before - chrono::Duration::seconds(1));
        assert!(ts <= Utc::now() + chrono::Duration::seconds(1));
    }

    #[test]
    fn deleted_message_lookup_returns_none() {
        let (_dir, db) = test_db();
        let user = db.signup("test", "test@example.com", "password", None).unwrap();

        let msg = db.insert_message(&user.id, "going away", None).unwrap();
        db.delete_message(&msg.id).unwrap();

        assert!(db.get_message(&msg.id).unwrap().is_none());
        assert!(matches!(db.delete_message(&msg.id), Err(StoreError::NotFound)));
    }

    #[test]
    fn message_requires_existing_user() {
        let (_dir, db) = test_db();
        let err = db.insert_message("no-such-id", "orphan", None).unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn messages_of_orders_newest_first() {
        let (_dir, db) = test_db();
        let user = db.signup("test", "test@example.com", "password", None).unwrap();

        let t1 = Utc.with_ymd_and_hms(2023, 5, 9, 12, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2023, 5, 9, 13, 0, 0).unwrap();
        db.insert_message(&user.id, "older", Some(t1)).unwrap();
        db.insert_message(&user.id, "newer", Some(t2)).unwrap();

        let texts: Vec<String> = db
            .messages_of(&user.id)
            .unwrap()
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, ["newer", "older"]);
    }

    #[test]
    fn timeline_includes_own_and_followed_messages_only() {
        let (_dir, db) = test_db();
        let me = db.signup("me", "me@example.com", "password", None).unwrap();
        let friend = db.signup("friend", "friend@example.com", "password", None).unwrap();
        let stranger = db
            .signup("stranger", "stranger@example.com", "password", None)
            .unwrap();

        db.follow(&me.id, &friend.id).unwrap();

        let t = |h| Utc.with_ymd_and_hms(2023, 5, 9, h, 0, 0).unwrap();
        db.insert_message(&me.id, "mine", Some(t(10))).unwrap();
        db.insert_message(&friend.id, "theirs", Some(t(11))).unwrap();
        db.insert_message(&stranger.id, "unrelated", Some(t(12))).unwrap();

        let texts: Vec<String> = db
            .timeline_for(&me.id, 100)
            .unwrap()
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, ["theirs", "mine"]);
    }
}
