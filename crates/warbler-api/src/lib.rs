pub mod auth;
pub mod error;
pub mod home;
pub mod identity;
pub mod messages;
pub mod pages;
pub mod session;
pub mod users;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::SameSite};
use tracing::warn;
use warbler_db::Database;

pub use error::{AppError, AppResult};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

/// Build the full application router, session layer included, so the server
/// binary and the test suites construct the exact same app.
pub fn router(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(30)));

    Router::new()
        .route("/", get(home::home))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/users", get(users::list_users))
        .route(
            "/users/profile",
            get(users::profile_page).post(users::update_profile),
        )
        .route("/users/delete", post(users::delete_account))
        .route("/users/follow/{id}", post(users::follow_user))
        .route("/users/stop-following/{id}", post(users::stop_following))
        .route("/users/add_like/{id}", post(users::add_like))
        .route("/users/{id}", get(users::show_user))
        .route("/users/{id}/following", get(users::following_page))
        .route("/users/{id}/followers", get(users::followers_page))
        .route("/users/{id}/likes", get(users::likes_page))
        .route(
            "/messages/new",
            get(messages::new_message_page).post(messages::create_message),
        )
        .route("/messages/{id}", get(messages::show_message))
        .route("/messages/{id}/delete", post(messages::delete_message))
        .fallback(pages::not_found_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::load_current_user,
        ))
        .layer(session_layer)
        .with_state(state)
}

/// SQLite stores `datetime('now')` as "YYYY-MM-DD HH:MM:SS" without a
/// timezone. Parse as naive UTC and convert.
pub(crate) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}': {}", raw, e);
            DateTime::default()
        })
}
