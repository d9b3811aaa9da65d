use axum::{
    Form,
    extract::State,
    response::Response,
};
use tower_sessions::Session;
use warbler_types::forms::{LoginForm, SignupForm};

use crate::identity::{self, SignupError};
use crate::{AppResult, AppState, pages, session};

pub async fn signup_page() -> Response {
    pages::signup_form(None)
}

/// Signup relies on the database uniqueness constraints rather than
/// pre-checking; a collision re-renders the form.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    let user = match identity::signup(
        &state.db,
        &form.username,
        &form.email,
        &form.password,
        form.image_url.as_deref(),
    ) {
        Ok(user) => user,
        Err(SignupError::Taken(_)) => {
            return Ok(pages::signup_form(Some("Username or email already taken.")));
        }
        Err(err) => return Err(err.into()),
    };

    session::log_in(&session, user.id).await?;
    Ok(pages::redirect("/"))
}

pub async fn login_page() -> Response {
    pages::login_form(None)
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    match identity::authenticate(&state.db, &form.username, &form.password)? {
        Some(user) => {
            session::log_in(&session, user.id).await?;
            session::flash(&session, &format!("Hello, {}!", user.username)).await?;
            Ok(pages::redirect("/"))
        }
        None => Ok(pages::login_form(Some("Invalid credentials."))),
    }
}

pub async fn logout(session: Session) -> AppResult<Response> {
    session.clear().await;
    session::flash(&session, "You have been logged out.").await?;
    Ok(pages::redirect("/login"))
}
