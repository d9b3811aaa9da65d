use axum::{
    Extension, Form,
    extract::{Path, Query, State},
    response::Response,
};
use tower_sessions::Session;
use warbler_types::forms::{ProfileForm, UserSearch};
use warbler_types::models::{Message, User};

use crate::identity::{self, user_model};
use crate::messages::message_model;
use crate::session::CurrentUser;
use crate::{AppResult, AppState, pages, session};

pub async fn list_users(
    State(state): State<AppState>,
    session: Session,
    Query(search): Query<UserSearch>,
) -> AppResult<Response> {
    let flash = session::take_flash(&session).await?;
    let users: Vec<User> = state
        .db
        .list_users(search.q.as_deref())?
        .into_iter()
        .map(user_model)
        .collect();
    Ok(pages::user_list(&users, flash.as_deref()))
}

pub async fn show_user(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let flash = session::take_flash(&session).await?;
    let Some(row) = state.db.get_user_by_id(id)? else {
        return Ok(pages::not_found());
    };
    let user = user_model(row);

    let messages: Vec<Message> = state
        .db
        .messages_for_user(id)?
        .into_iter()
        .map(message_model)
        .collect();
    Ok(pages::user_page(&user, &messages, flash.as_deref()))
}

pub async fn following_page(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Extension(CurrentUser(viewer)): Extension<CurrentUser>,
) -> AppResult<Response> {
    if viewer.is_none() {
        return session::access_unauthorized(&session).await;
    }
    let Some(row) = state.db.get_user_by_id(id)? else {
        return Ok(pages::not_found());
    };
    let users: Vec<User> = state.db.following(id)?.into_iter().map(user_model).collect();
    Ok(pages::follow_list("Following", &user_model(row), &users))
}

pub async fn followers_page(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Extension(CurrentUser(viewer)): Extension<CurrentUser>,
) -> AppResult<Response> {
    if viewer.is_none() {
        return session::access_unauthorized(&session).await;
    }
    let Some(row) = state.db.get_user_by_id(id)? else {
        return Ok(pages::not_found());
    };
    let users: Vec<User> = state.db.followers(id)?.into_iter().map(user_model).collect();
    Ok(pages::follow_list("Followers", &user_model(row), &users))
}

pub async fn likes_page(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Extension(CurrentUser(viewer)): Extension<CurrentUser>,
) -> AppResult<Response> {
    if viewer.is_none() {
        return session::access_unauthorized(&session).await;
    }
    let Some(row) = state.db.get_user_by_id(id)? else {
        return Ok(pages::not_found());
    };
    let messages: Vec<Message> = state
        .db
        .liked_messages(id)?
        .into_iter()
        .map(message_model)
        .collect();
    Ok(pages::liked_messages(&user_model(row), &messages))
}

pub async fn follow_user(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<Response> {
    let Some(user) = user else {
        return session::access_unauthorized(&session).await;
    };
    // Following yourself is refused like any other bad mutation.
    if id == user.id {
        return session::access_unauthorized(&session).await;
    }
    if state.db.get_user_by_id(id)?.is_none() {
        return Ok(pages::not_found());
    }

    state.db.follow(user.id, id)?;
    Ok(pages::redirect(&format!("/users/{}/following", user.id)))
}

pub async fn stop_following(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<Response> {
    let Some(user) = user else {
        return session::access_unauthorized(&session).await;
    };

    state.db.unfollow(user.id, id)?;
    Ok(pages::redirect(&format!("/users/{}/following", user.id)))
}

/// Toggle a like on someone else's message. A second like takes the first
/// one back; your own messages cannot be liked at all.
pub async fn add_like(
    State(state): State<AppState>,
    session: Session,
    Path(message_id): Path<i64>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<Response> {
    let Some(user) = user else {
        return session::access_unauthorized(&session).await;
    };

    let Some(msg) = state.db.get_message(message_id)? else {
        return Ok(pages::not_found());
    };

    if msg.user_id == user.id {
        return Ok(pages::unauthorized());
    }

    state.db.toggle_like(user.id, msg.id)?;
    Ok(pages::redirect("/"))
}

pub async fn profile_page(
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<Response> {
    let Some(user) = user else {
        return session::access_unauthorized(&session).await;
    };
    Ok(pages::profile_form(&user, None))
}

/// Profile edits re-authenticate with the current password before touching
/// anything.
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<ProfileForm>,
) -> AppResult<Response> {
    let Some(user) = user else {
        return session::access_unauthorized(&session).await;
    };

    if identity::authenticate(&state.db, &user.username, &form.password)?.is_none() {
        return session::access_unauthorized(&session).await;
    }

    let image_url = match form.image_url.as_deref() {
        Some(url) if !url.trim().is_empty() => url,
        _ => identity::DEFAULT_IMAGE_URL,
    };

    match state
        .db
        .update_user(user.id, &form.username, &form.email, image_url)
    {
        Ok(()) => Ok(pages::redirect(&format!("/users/{}", user.id))),
        Err(e) if e.is_constraint() => Ok(pages::profile_form(
            &user,
            Some("Username or email already taken."),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_account(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<Response> {
    let Some(user) = user else {
        return session::access_unauthorized(&session).await;
    };

    state.db.delete_user(user.id)?;
    session.clear().await;
    Ok(pages::redirect("/signup"))
}
