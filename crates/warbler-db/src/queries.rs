use crate::models::{MessageRow, UserRow};
use crate::{Database, Result};
use rusqlite::{Connection, Row, params};

impl Database {
    // -- Users --

    /// Insert a user row and return it. Username/email collisions come
    /// back as `DbError::Constraint`; callers decide how to surface them.
    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        image_url: &str,
    ) -> Result<UserRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, email, password, image_url) VALUES (?1, ?2, ?3, ?4)",
                (username, email, password_hash, image_url),
            )?;
            let row = conn
                .prepare(
                    "SELECT id, username, email, password, image_url, created_at
                     FROM users WHERE id = ?1",
                )?
                .query_row([conn.last_insert_rowid()], user_from_row)?;
            Ok(row)
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            conn.prepare(
                "SELECT id, username, email, password, image_url, created_at
                 FROM users WHERE username = ?1",
            )?
            .query_row([username], user_from_row)
            .optional()
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            conn.prepare(
                "SELECT id, username, email, password, image_url, created_at
                 FROM users WHERE id = ?1",
            )?
            .query_row([id], user_from_row)
            .optional()
        })
    }

    pub fn list_users(&self, search: Option<&str>) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| match search {
            Some(q) => collect_users(
                conn,
                "SELECT id, username, email, password, image_url, created_at
                 FROM users WHERE username LIKE '%' || ?1 || '%' ORDER BY username",
                params![q],
            ),
            None => collect_users(
                conn,
                "SELECT id, username, email, password, image_url, created_at
                 FROM users ORDER BY username",
                params![],
            ),
        })
    }

    pub fn update_user(
        &self,
        id: i64,
        username: &str,
        email: &str,
        image_url: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET username = ?1, email = ?2, image_url = ?3 WHERE id = ?4",
                params![username, email, image_url, id],
            )?;
            Ok(())
        })
    }

    /// Messages, follows and likes go with the user via ON DELETE CASCADE.
    pub fn delete_user(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(())
        })
    }

    // -- Messages --

    pub fn insert_message(&self, user_id: i64, text: &str) -> Result<MessageRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (text, user_id) VALUES (?1, ?2)",
                params![text, user_id],
            )?;
            let row = conn
                .prepare(
                    "SELECT m.id, m.text, m.user_id, u.username, m.created_at
                     FROM messages m JOIN users u ON m.user_id = u.id
                     WHERE m.id = ?1",
                )?
                .query_row([conn.last_insert_rowid()], message_from_row)?;
            Ok(row)
        })
    }

    pub fn get_message(&self, id: i64) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| {
            conn.prepare(
                "SELECT m.id, m.text, m.user_id, u.username, m.created_at
                 FROM messages m JOIN users u ON m.user_id = u.id
                 WHERE m.id = ?1",
            )?
            .query_row([id], message_from_row)
            .optional()
        })
    }

    pub fn messages_for_user(&self, user_id: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            collect_messages(
                conn,
                "SELECT m.id, m.text, m.user_id, u.username, m.created_at
                 FROM messages m JOIN users u ON m.user_id = u.id
                 WHERE m.user_id = ?1
                 ORDER BY m.created_at DESC, m.id DESC",
                params![user_id],
            )
        })
    }

    /// Most recent messages from the user and everyone they follow.
    pub fn feed_messages(&self, user_id: i64, limit: u32) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            collect_messages(
                conn,
                "SELECT m.id, m.text, m.user_id, u.username, m.created_at
                 FROM messages m JOIN users u ON m.user_id = u.id
                 WHERE m.user_id = ?1
                    OR m.user_id IN (SELECT followed_id FROM follows WHERE follower_id = ?1)
                 ORDER BY m.created_at DESC, m.id DESC
                 LIMIT ?2",
                params![user_id, limit],
            )
        })
    }

    pub fn delete_message(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM messages WHERE id = ?1", [id])?;
            Ok(())
        })
    }

    // -- Follows --

    /// Idempotent: following someone you already follow is a no-op.
    pub fn follow(&self, follower_id: i64, followed_id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO follows (follower_id, followed_id) VALUES (?1, ?2)",
                params![follower_id, followed_id],
            )?;
            Ok(())
        })
    }

    pub fn unfollow(&self, follower_id: i64, followed_id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM follows WHERE follower_id = ?1 AND followed_id = ?2",
                params![follower_id, followed_id],
            )?;
            Ok(())
        })
    }

    pub fn is_following(&self, follower_id: i64, followed_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM follows WHERE follower_id = ?1 AND followed_id = ?2",
                params![follower_id, followed_id],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
    }

    pub fn is_followed_by(&self, user_id: i64, other_id: i64) -> Result<bool> {
        self.is_following(other_id, user_id)
    }

    pub fn following(&self, user_id: i64) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            collect_users(
                conn,
                "SELECT u.id, u.username, u.email, u.password, u.image_url, u.created_at
                 FROM users u JOIN follows f ON u.id = f.followed_id
                 WHERE f.follower_id = ?1 ORDER BY u.username",
                params![user_id],
            )
        })
    }

    pub fn followers(&self, user_id: i64) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            collect_users(
                conn,
                "SELECT u.id, u.username, u.email, u.password, u.image_url, u.created_at
                 FROM users u JOIN follows f ON u.id = f.follower_id
                 WHERE f.followed_id = ?1 ORDER BY u.username",
                params![user_id],
            )
        })
    }

    // -- Likes --

    /// Toggle a like: removes if present, inserts if not.
    /// Returns true when the like was added, false when removed.
    pub fn toggle_like(&self, user_id: i64, message_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let existing: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM likes WHERE user_id = ?1 AND message_id = ?2",
                    params![user_id, message_id],
                    |row| row.get(0),
                )
                .optional()?;

            if existing.is_some() {
                conn.execute(
                    "DELETE FROM likes WHERE user_id = ?1 AND message_id = ?2",
                    params![user_id, message_id],
                )?;
                Ok(false)
            } else {
                conn.execute(
                    "INSERT INTO likes (user_id, message_id) VALUES (?1, ?2)",
                    params![user_id, message_id],
                )?;
                Ok(true)
            }
        })
    }

    pub fn liked_messages(&self, user_id: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            collect_messages(
                conn,
                "SELECT m.id, m.text, m.user_id, u.username, m.created_at
                 FROM messages m
                 JOIN users u ON m.user_id = u.id
                 JOIN likes l ON m.id = l.message_id
                 WHERE l.user_id = ?1
                 ORDER BY l.created_at DESC",
                params![user_id],
            )
        })
    }

    pub fn likes_message(&self, user_id: i64, message_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM likes WHERE user_id = ?1 AND message_id = ?2",
                params![user_id, message_id],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
    }
}

fn user_from_row(row: &Row) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        image_url: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn message_from_row(row: &Row) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        text: row.get(1)?,
        user_id: row.get(2)?,
        username: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn collect_users(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<UserRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, user_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn collect_messages(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, message_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
