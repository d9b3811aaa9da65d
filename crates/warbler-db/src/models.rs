/// Database row types — these map directly to SQLite rows.
/// Distinct from warbler-types API models to keep the DB layer independent.

#[derive(Debug)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_url: String,
    pub created_at: String,
}

pub struct MessageRow {
    pub id: i64,
    pub text: String,
    pub user_id: i64,
    pub username: String,
    pub created_at: String,
}
