use anyhow::Context;
use axum::{Extension, extract::State, response::Response};
use tower_sessions::Session;
use warbler_types::models::Message;

use crate::messages::message_model;
use crate::session::CurrentUser;
use crate::{AppResult, AppState, pages, session};

/// Logged-in users get the most recent warbles from themselves and the
/// users they follow; everyone else gets the signup pitch. Flash messages
/// from redirects land here.
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<Response> {
    let flash = session::take_flash(&session).await?;

    let Some(user) = user else {
        return Ok(pages::anon_home(flash.as_deref()));
    };

    // Run the feed query off the async runtime
    let db = state.clone();
    let user_id = user.id;
    let rows = tokio::task::spawn_blocking(move || db.db.feed_messages(user_id, 100))
        .await
        .context("feed query task failed")??;

    let messages: Vec<Message> = rows.into_iter().map(message_model).collect();
    Ok(pages::home_feed(&user, &messages, flash.as_deref()))
}
