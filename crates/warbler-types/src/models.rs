use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A signed-up user, minus the password hash. This is what handlers and
/// pages see; the hash never leaves warbler-db rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub text: String,
    pub user_id: i64,
    /// Username of the owning user, joined in at query time.
    pub username: String,
    pub created_at: DateTime<Utc>,
}
