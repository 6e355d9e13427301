use rusqlite::Connection;
use uuid::Uuid;

use crate::models::{ProfileUpdate, UserRow};
use crate::{Database, OptionalExt, StoreError};
use warbler_types::{DEFAULT_HEADER_IMAGE_URL, DEFAULT_IMAGE_URL};

pub(crate) const USER_COLUMNS: &str =
    "users.id, users.username, users.email, users.password, users.image_url, users.header_image_url, users.bio, users.location, users.created_at";

impl Database {
    /// Create a new user. The password is hashed before it touches the
    /// store; the insert commits as its own unit of work.
    pub fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
        image_url: Option<&str>,
    ) -> Result<UserRow, StoreError> {
        let row = UserRow {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password: warbler_password::hash(password)?,
            image_url: non_blank(image_url).unwrap_or(DEFAULT_IMAGE_URL).to_string(),
            header_image_url: DEFAULT_HEADER_IMAGE_URL.to_string(),
            bio: None,
            location: None,
            created_at: crate::now_string(),
        };

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, password, image_url, header_image_url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    row.id,
                    row.username,
                    row.email,
                    row.password,
                    row.image_url,
                    row.header_image_url,
                    row.created_at
                ],
            )
            .map_err(StoreError::from_sqlite)?;
            Ok(())
        })?;

        Ok(row)
    }

    /// Look up a user by username and verify the password against the
    /// stored hash. Unknown username and wrong password collapse into the
    /// same `None` result so callers cannot probe for existing usernames.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserRow>, StoreError> {
        let Some(user) = self.get_user_by_username(username)? else {
            return Ok(None);
        };

        if warbler_password::verify(password, &user.password) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn list_users(&self) -> Result<Vec<UserRow>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY username"))?;
            let rows = stmt
                .query_map([], user_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Apply profile edits and return the updated row, as one transaction.
    /// Blank image fields fall back to the documented defaults.
    pub fn update_profile(&self, id: &str, update: ProfileUpdate) -> Result<UserRow, StoreError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let affected = tx
                .execute(
                    "UPDATE users
                     SET username = ?1, email = ?2, image_url = ?3,
                         header_image_url = ?4, bio = ?5, location = ?6
                     WHERE id = ?7",
                    rusqlite::params![
                        update.username,
                        update.email,
                        non_blank(update.image_url.as_deref()).unwrap_or(DEFAULT_IMAGE_URL),
                        non_blank(update.header_image_url.as_deref())
                            .unwrap_or(DEFAULT_HEADER_IMAGE_URL),
                        update.bio,
                        update.location,
                        id
                    ],
                )
                .map_err(StoreError::from_sqlite)?;
            if affected == 0 {
                return Err(StoreError::NotFound);
            }

            let row = query_user_by_id(&tx, id)?.ok_or(StoreError::NotFound)?;
            tx.commit()?;
            Ok(row)
        })
    }

    /// Remove a user. Their messages and follow edges go with them via
    /// `ON DELETE CASCADE`.
    pub fn delete_user(&self, id: &str) -> Result<(), StoreError> {
        let affected =
            self.with_conn(|conn| Ok(conn.execute("DELETE FROM users WHERE id = ?1", [id])?))?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub(crate) fn query_user_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<UserRow>, StoreError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"))?;
    stmt.query_row([username], user_from_row).optional()
}

pub(crate) fn query_user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>, StoreError> {
    let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;
    stmt.query_row([id], user_from_row).optional()
}

pub(crate) fn user_from_row(row: &rusqlite::Row) -> Result<UserRow, rusqlite::Error> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        image_url: row.get(4)?,
        header_image_url: row.get(5)?,
        bio: row.get(6)?,
        location: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use crate::models::ProfileUpdate;
    use crate::{StoreError, test_db};
    use warbler_types::{DEFAULT_HEADER_IMAGE_URL, DEFAULT_IMAGE_URL};

    #[test]
    fn signup_stores_a_hash_not_the_plaintext() {
        let (_dir, db) = test_db();
        let user = db.signup("test", "test@example.com", "password", None).unwrap();

        assert_eq!(user.username, "test");
        assert_eq!(user.email, "test@example.com");
        assert_ne!(user.password, "password");

        let stored = db.get_user_by_id(&user.id).unwrap().unwrap();
        assert_ne!(stored.password, "password");
        assert!(stored.password.starts_with("$argon2"));
    }

    #[test]
    fn signup_applies_default_image_when_blank() {
        let (_dir, db) = test_db();
        let user = db.signup("test", "test@example.com", "password", Some("")).unwrap();
        assert_eq!(user.image_url, DEFAULT_IMAGE_URL);
        assert_eq!(user.header_image_url, DEFAULT_HEADER_IMAGE_URL);

        let other = db
            .signup("test2", "test2@example.com", "password", Some("/me.png"))
            .unwrap();
        assert_eq!(other.image_url, "/me.png");
    }

    #[test]
    fn authenticate_roundtrip() {
        let (_dir, db) = test_db();
        db.signup("test", "test@example.com", "password", None).unwrap();

        let user = db.authenticate("test", "password").unwrap().unwrap();
        assert_eq!(user.username, "test");
        assert_eq!(user.email, "test@example.com");

        assert!(db.authenticate("test", "not-password").unwrap().is_none());
        assert!(db.authenticate("nobody", "password").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_rejected() {
        let (_dir, db) = test_db();
        db.signup("test", "test@example.com", "password", None).unwrap();

        let err = db
            .signup("test", "other@example.com", "password", None)
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("username")));

        // First signup unaffected
        assert!(db.authenticate("test", "password").unwrap().is_some());
    }

    #[test]
    fn duplicate_email_rejected() {
        let (_dir, db) = test_db();
        db.signup("test", "test@example.com", "password", None).unwrap();

        let err = db
            .signup("other", "test@example.com", "password", None)
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("email")));
    }

    #[test]
    fn update_profile_roundtrip() {
        let (_dir, db) = test_db();
        let user = db.signup("test", "test@example.com", "password", None).unwrap();

        let updated = db
            .update_profile(
                &user.id,
                ProfileUpdate {
                    username: "renamed".into(),
                    email: "renamed@example.com".into(),
                    image_url: Some("/new.png".into()),
                    header_image_url: None,
                    bio: Some("chirp".into()),
                    location: Some("treetop".into()),
                },
            )
            .unwrap();

        assert_eq!(updated.username, "renamed");
        assert_eq!(updated.image_url, "/new.png");
        assert_eq!(updated.header_image_url, DEFAULT_HEADER_IMAGE_URL);
        assert_eq!(updated.bio.as_deref(), Some("chirp"));

        let stored = db.get_user_by_id(&user.id).unwrap().unwrap();
        assert_eq!(stored.email, "renamed@example.com");
        assert_eq!(stored.location.as_deref(), Some("treetop"));
    }

    #[test]
    fn update_profile_rejects_taken_username() {
        let (_dir, db) = test_db();
        db.signup("taken", "taken@example.com", "password", None).unwrap();
        let user = db.signup("test", "test@example.com", "password", None).unwrap();

        let err = db
            .update_profile(
                &user.id,
                ProfileUpdate {
                    username: "taken".into(),
                    email: "test@example.com".into(),
                    image_url: None,
                    header_image_url: None,
                    bio: None,
                    location: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("username")));
    }

    #[test]
    fn delete_user_cascades_to_messages_and_follows() {
        let (_dir, db) = test_db();
        let u1 = db.signup("u1", "u1@example.com", "password", None).unwrap();
        let u2 = db.signup("u2", "u2@example.com", "password", None).unwrap();

        let msg = db.insert_message(&u1.id, "soon gone", None).unwrap();
        db.follow(&u1.id, &u2.id).unwrap();
        db.follow(&u2.id, &u1.id).unwrap();

        db.delete_user(&u1.id).unwrap();

        assert!(db.get_user_by_id(&u1.id).unwrap().is_none());
        assert!(db.get_message(&msg.id).unwrap().is_none());
        assert!(db.followers_of(&u2.id).unwrap().is_empty());
        assert!(db.following_of(&u2.id).unwrap().is_empty());
    }

    #[test]
    fn delete_missing_user_is_not_found() {
        let (_dir, db) = test_db();
        let err = db.delete_user("no-such-id").unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }
}
