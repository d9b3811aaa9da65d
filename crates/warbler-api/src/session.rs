use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;
use warbler_types::models::User;

use crate::{AppResult, AppState, identity, pages};

/// Session key naming the currently authenticated user id.
pub const CURR_USER_KEY: &str = "curr_user";

const FLASH_KEY: &str = "flash";

/// Resolved once per request by [`load_current_user`]; handlers read it
/// back out of the request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

/// Middleware: turn the session's user id into a loaded user. A session id
/// pointing at a user that no longer exists counts as logged out, same as
/// no session at all.
pub async fn load_current_user(
    State(state): State<AppState>,
    session: Session,
    mut req: Request,
    next: Next,
) -> AppResult<Response> {
    let user = match session.get::<i64>(CURR_USER_KEY).await? {
        Some(id) => state.db.get_user_by_id(id)?.map(identity::user_model),
        None => None,
    };

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

pub async fn log_in(session: &Session, user_id: i64) -> AppResult<()> {
    session.insert(CURR_USER_KEY, user_id).await?;
    Ok(())
}

pub async fn flash(session: &Session, message: &str) -> AppResult<()> {
    session.insert(FLASH_KEY, message).await?;
    Ok(())
}

pub async fn take_flash(session: &Session) -> AppResult<Option<String>> {
    Ok(session.remove::<String>(FLASH_KEY).await?)
}

/// The uniform rejection for unauthenticated or unauthorized mutations:
/// flash "Access unauthorized." and bounce home, where the flash renders.
pub async fn access_unauthorized(session: &Session) -> AppResult<Response> {
    flash(session, "Access unauthorized.").await?;
    Ok(pages::redirect("/"))
}
