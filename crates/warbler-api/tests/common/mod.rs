#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use tower::ServiceExt;
use warbler_api::{AppState, AppStateInner};
use warbler_db::Database;

/// Fresh app over a throwaway in-memory database. The state handle is
/// returned too so tests can inspect rows directly.
pub fn test_app() -> (Router, AppState) {
    let db = Database::open_in_memory().unwrap();
    let state: AppState = Arc::new(AppStateInner { db });
    (warbler_api::router(state.clone()), state)
}

pub async fn get(app: &Router, path: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_form(
    app: &Router,
    path: &str,
    body: &str,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// The session cookie pair from a response's Set-Cookie header.
pub fn session_cookie(res: &Response<Body>) -> String {
    res.headers()
        .get(header::SET_COOKIE)
        .expect("response should carry a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

pub async fn body_text(res: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Chase a redirect once, picking up any session cookie the redirect set
/// (the flash lives there).
pub async fn follow_redirect(
    app: &Router,
    res: Response<Body>,
    cookie: Option<&str>,
) -> Response<Body> {
    assert!(
        res.status().is_redirection(),
        "expected a redirect, got {}",
        res.status()
    );
    let location = res
        .headers()
        .get(header::LOCATION)
        .expect("redirect without Location")
        .to_str()
        .unwrap()
        .to_string();

    let fresh = res
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().split(';').next().unwrap().to_string());

    get(app, &location, fresh.as_deref().or(cookie)).await
}

/// Sign up through the HTTP surface and hand back the session cookie.
pub async fn signup(app: &Router, username: &str, email: &str) -> String {
    let body = format!("username={username}&email={email}&password=password");
    let res = post_form(app, "/signup", &body, None).await;
    assert!(
        res.status().is_redirection(),
        "signup should redirect, got {}",
        res.status()
    );
    session_cookie(&res)
}

pub fn user_id(state: &AppState, username: &str) -> i64 {
    state
        .db
        .get_user_by_username(username)
        .unwrap()
        .expect("user should exist")
        .id
}
