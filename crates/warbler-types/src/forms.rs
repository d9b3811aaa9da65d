use serde::Deserialize;

// HTML form payloads. Browsers submit these urlencoded, so unlike a JSON
// API we tolerate unknown fields.

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageForm {
    pub text: String,
}

/// Profile edits require the current password; the handler re-authenticates
/// before applying anything.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub username: String,
    pub email: String,
    pub image_url: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UserSearch {
    pub q: Option<String>,
}
