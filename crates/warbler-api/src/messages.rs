use anyhow::Context;
use axum::{
    Extension, Form,
    extract::{Path, State},
    response::Response,
};
use tower_sessions::Session;
use warbler_db::models::MessageRow;
use warbler_types::forms::MessageForm;
use warbler_types::models::Message;

use crate::session::CurrentUser;
use crate::{AppResult, AppState, pages, parse_timestamp, session};

pub async fn new_message_page(
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<Response> {
    if user.is_none() {
        return session::access_unauthorized(&session).await;
    }
    Ok(pages::new_message_form())
}

pub async fn create_message(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<MessageForm>,
) -> AppResult<Response> {
    let Some(user) = user else {
        return session::access_unauthorized(&session).await;
    };

    let db = state.clone();
    let user_id = user.id;
    tokio::task::spawn_blocking(move || db.db.insert_message(user_id, &form.text))
        .await
        .context("message insert task failed")??;

    Ok(pages::redirect(&format!("/users/{}", user.id)))
}

pub async fn show_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    match state.db.get_message(id)? {
        Some(row) => Ok(pages::message_page(&message_model(row))),
        None => Ok(pages::not_found()),
    }
}

/// Only the owner may delete; everyone else gets the same rejection an
/// anonymous request gets, and the row stays put.
pub async fn delete_message(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<Response> {
    let Some(user) = user else {
        return session::access_unauthorized(&session).await;
    };

    let Some(row) = state.db.get_message(id)? else {
        return Ok(pages::not_found());
    };

    if row.user_id != user.id {
        return session::access_unauthorized(&session).await;
    }

    state.db.delete_message(id)?;
    Ok(pages::redirect(&format!("/users/{}", user.id)))
}

pub(crate) fn message_model(row: MessageRow) -> Message {
    Message {
        id: row.id,
        text: row.text,
        user_id: row.user_id,
        username: row.username,
        created_at: parse_timestamp(&row.created_at),
    }
}
