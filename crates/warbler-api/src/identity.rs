use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use warbler_db::{Database, DbError};
use warbler_db::models::UserRow;
use warbler_types::models::User;

use crate::parse_timestamp;

/// Substituted at signup when the form leaves the image blank.
pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-pic.png";

#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    /// Username or email collided with an existing row. Signup does not
    /// pre-check uniqueness; the constraint itself is the check.
    #[error("username or email already taken")]
    Taken(#[source] DbError),

    #[error(transparent)]
    Db(DbError),

    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),
}

/// Create a user with an Argon2id-hashed password. The plaintext never
/// reaches the database.
pub fn signup(
    db: &Database,
    username: &str,
    email: &str,
    password: &str,
    image_url: Option<&str>,
) -> Result<User, SignupError> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(SignupError::Hash)?
        .to_string();

    let image_url = match image_url {
        Some(url) if !url.trim().is_empty() => url,
        _ => DEFAULT_IMAGE_URL,
    };

    let row = db
        .create_user(username, email, &password_hash, image_url)
        .map_err(|e| {
            if e.is_constraint() {
                SignupError::Taken(e)
            } else {
                SignupError::Db(e)
            }
        })?;

    Ok(user_model(row))
}

/// Look the user up by username and verify the password against the stored
/// hash. Unknown username and wrong password are indistinguishable to the
/// caller: both come back as `None`, never as an error.
pub fn authenticate(
    db: &Database,
    username: &str,
    password: &str,
) -> Result<Option<User>, DbError> {
    let Some(row) = db.get_user_by_username(username)? else {
        return Ok(None);
    };

    // An unparsable stored hash cannot match anything.
    let Ok(parsed_hash) = PasswordHash::new(&row.password) else {
        return Ok(None);
    };

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
    {
        Ok(Some(user_model(row)))
    } else {
        Ok(None)
    }
}

pub(crate) fn user_model(row: UserRow) -> User {
    User {
        id: row.id,
        username: row.username,
        email: row.email,
        image_url: row.image_url,
        created_at: parse_timestamp(&row.created_at),
    }
}
