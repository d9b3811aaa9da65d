//! Server-rendered pages. Warbler's HTML is deliberately plain: a layout
//! shell, a flash slot, and per-page bodies assembled with `format!`.

use axum::{
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use warbler_types::models::{Message, User};

pub fn redirect(to: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, to)]).into_response()
}

pub fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(layout("Not found", None, "<h1>Page not found.</h1>")),
    )
        .into_response()
}

pub async fn not_found_handler() -> Response {
    not_found()
}

/// Rendered directly (not via flash + redirect) where a request is refused
/// in place, e.g. liking your own message.
pub fn unauthorized() -> Response {
    Html(layout(
        "Unauthorized",
        None,
        "<p class=\"danger\">Access unauthorized.</p>",
    ))
    .into_response()
}

pub fn home_feed(user: &User, messages: &[Message], flash: Option<&str>) -> Response {
    let body = format!(
        "<h1>@{}</h1>\n{}\n<ul class=\"feed\">\n{}</ul>",
        escape(&user.username),
        "<p><a href=\"/messages/new\">New warble</a></p>",
        message_list(messages)
    );
    Html(layout("Home", flash, &body)).into_response()
}

pub fn anon_home(flash: Option<&str>) -> Response {
    let body = "<h1>What's happening?</h1>\n\
                <p><a href=\"/signup\">Sign up now</a> or <a href=\"/login\">log in</a>.</p>";
    Html(layout("Welcome", flash, body)).into_response()
}

pub fn signup_form(error: Option<&str>) -> Response {
    let body = format!(
        "<h1>Join Warbler today.</h1>\n{}\n\
         <form method=\"POST\" action=\"/signup\">\n\
         <input name=\"username\" placeholder=\"Username\">\n\
         <input name=\"email\" placeholder=\"E-mail\">\n\
         <input name=\"password\" type=\"password\" placeholder=\"Password\">\n\
         <input name=\"image_url\" placeholder=\"Image URL (optional)\">\n\
         <button>Sign me up!</button>\n\
         </form>",
        error_html(error)
    );
    Html(layout("Sign up", None, &body)).into_response()
}

pub fn login_form(error: Option<&str>) -> Response {
    let body = format!(
        "<h1>Welcome back.</h1>\n{}\n\
         <form method=\"POST\" action=\"/login\">\n\
         <input name=\"username\" placeholder=\"Username\">\n\
         <input name=\"password\" type=\"password\" placeholder=\"Password\">\n\
         <button>Log in</button>\n\
         </form>",
        error_html(error)
    );
    Html(layout("Log in", None, &body)).into_response()
}

pub fn new_message_form() -> Response {
    let body = "<h1>Add my message!</h1>\n\
                <form method=\"POST\" action=\"/messages/new\">\n\
                <textarea name=\"text\" placeholder=\"What's happening?\"></textarea>\n\
                <button>Add</button>\n\
                </form>";
    Html(layout("New message", None, body)).into_response()
}

pub fn message_page(msg: &Message) -> Response {
    let body = format!(
        "<article class=\"message\">\n\
         <p>{}</p>\n\
         <footer><a href=\"/users/{}\">@{}</a> <time>{}</time></footer>\n\
         <form method=\"POST\" action=\"/messages/{}/delete\"><button>Delete</button></form>\n\
         </article>",
        escape(&msg.text),
        msg.user_id,
        escape(&msg.username),
        msg.created_at.format("%d %B %Y"),
        msg.id,
    );
    Html(layout("Message", None, &body)).into_response()
}

pub fn user_list(users: &[User], flash: Option<&str>) -> Response {
    let body = format!("<h1>Users</h1>\n<ul>\n{}</ul>", user_items(users));
    Html(layout("Users", flash, &body)).into_response()
}

pub fn user_page(user: &User, messages: &[Message], flash: Option<&str>) -> Response {
    let body = format!(
        "<h1>@{}</h1>\n<img src=\"{}\" alt=\"\">\n\
         <nav><a href=\"/users/{id}/following\">Following</a> \
         <a href=\"/users/{id}/followers\">Followers</a> \
         <a href=\"/users/{id}/likes\">Likes</a></nav>\n\
         <form method=\"POST\" action=\"/users/follow/{id}\"><button>Follow</button></form>\n\
         <ul class=\"feed\">\n{}</ul>",
        escape(&user.username),
        escape(&user.image_url),
        message_list(messages),
        id = user.id,
    );
    Html(layout(&user.username, flash, &body)).into_response()
}

pub fn follow_list(title: &str, user: &User, users: &[User]) -> Response {
    let body = format!(
        "<h1>@{} / {}</h1>\n<ul>\n{}</ul>",
        escape(&user.username),
        escape(title),
        user_items(users)
    );
    Html(layout(title, None, &body)).into_response()
}

pub fn liked_messages(user: &User, messages: &[Message]) -> Response {
    let body = format!(
        "<h1>@{} / Likes</h1>\n<ul class=\"feed\">\n{}</ul>",
        escape(&user.username),
        message_list(messages)
    );
    Html(layout("Likes", None, &body)).into_response()
}

pub fn profile_form(user: &User, error: Option<&str>) -> Response {
    let body = format!(
        "<h1>Edit your profile.</h1>\n{}\n\
         <form method=\"POST\" action=\"/users/profile\">\n\
         <input name=\"username\" value=\"{}\">\n\
         <input name=\"email\" value=\"{}\">\n\
         <input name=\"image_url\" value=\"{}\">\n\
         <input name=\"password\" type=\"password\" placeholder=\"Current password\">\n\
         <button>Save</button>\n\
         </form>\n\
         <form method=\"POST\" action=\"/users/delete\"><button>Delete account</button></form>",
        error_html(error),
        escape(&user.username),
        escape(&user.email),
        escape(&user.image_url),
    );
    Html(layout("Edit profile", None, &body)).into_response()
}

fn layout(title: &str, flash: Option<&str>, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{} / Warbler</title></head>\n<body>\n\
         <nav><a href=\"/\">Warbler</a> <a href=\"/users\">Users</a></nav>\n{}\n\
         <main>\n{}\n</main>\n</body>\n</html>",
        escape(title),
        flash
            .map(|msg| format!("<div class=\"flash danger\">{}</div>", escape(msg)))
            .unwrap_or_default(),
        body
    )
}

fn error_html(error: Option<&str>) -> String {
    error
        .map(|msg| format!("<p class=\"danger\">{}</p>", escape(msg)))
        .unwrap_or_default()
}

fn message_list(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| {
            format!(
                "<li><a href=\"/messages/{}\">{}</a> \
                 <span>@{}</span> <time>{}</time></li>\n",
                m.id,
                escape(&m.text),
                escape(&m.username),
                m.created_at.format("%d %B %Y"),
            )
        })
        .collect()
}

fn user_items(users: &[User]) -> String {
    users
        .iter()
        .map(|u| {
            format!(
                "<li><a href=\"/users/{}\"><img src=\"{}\" alt=\"\">@{}</a></li>\n",
                u.id,
                escape(&u.image_url),
                escape(&u.username),
            )
        })
        .collect()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
