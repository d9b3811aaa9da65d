//! User view tests: signup/login flows, follows, likes, profile edits and
//! account deletion through the HTTP surface.

mod common;

use axum::http::StatusCode;
use common::*;

#[tokio::test]
async fn signup_logs_in_and_shows_feed() {
    let (app, _state) = test_app();

    let body = "username=testuser&email=test@test.com&password=password";
    let res = post_form(&app, "/signup", body, None).await;
    assert_eq!(res.status(), StatusCode::FOUND);

    let cookie = session_cookie(&res);
    let page = follow_redirect(&app, res, Some(&cookie)).await;
    assert_eq!(page.status(), StatusCode::OK);
    assert!(body_text(page).await.contains("@testuser"));
}

#[tokio::test]
async fn duplicate_signup_rerenders_form() {
    let (app, _state) = test_app();
    signup(&app, "testuser", "test@test.com").await;

    // Same username, fresh client
    let body = "username=testuser&email=other@test.com&password=password";
    let res = post_form(&app, "/signup", body, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("already taken"));

    // Same email too
    let body = "username=othername&email=test@test.com&password=password";
    let res = post_form(&app, "/signup", body, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("already taken"));
}

#[tokio::test]
async fn login_with_good_and_bad_credentials() {
    let (app, _state) = test_app();
    signup(&app, "testuser", "test@test.com").await;

    let res = post_form(&app, "/login", "username=testuser&password=password", None).await;
    assert_eq!(res.status(), StatusCode::FOUND);

    let res = post_form(&app, "/login", "username=testuser&password=BAD", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("Invalid credentials"));

    let res = post_form(&app, "/login", "username=bob&password=password", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("Invalid credentials"));
}

#[tokio::test]
async fn logout_ends_the_session() {
    let (app, _state) = test_app();
    let cookie = signup(&app, "testuser", "test@test.com").await;

    let res = get(&app, "/logout", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::FOUND);

    let res = post_form(&app, "/messages/new", "text=Hello", Some(&cookie)).await;
    let page = follow_redirect(&app, res, Some(&cookie)).await;
    assert!(body_text(page).await.contains("Access unauthorized"));
}

#[tokio::test]
async fn user_list_and_search() {
    let (app, _state) = test_app();
    signup(&app, "alice", "alice@test.com").await;
    signup(&app, "bob", "bob@test.com").await;

    let res = get(&app, "/users", None).await;
    let body = body_text(res).await;
    assert!(body.contains("@alice"));
    assert!(body.contains("@bob"));

    let res = get(&app, "/users?q=ali", None).await;
    let body = body_text(res).await;
    assert!(body.contains("@alice"));
    assert!(!body.contains("@bob"));
}

#[tokio::test]
async fn user_profile_shows_messages_or_404() {
    let (app, state) = test_app();
    let cookie = signup(&app, "testuser", "test@test.com").await;
    post_form(&app, "/messages/new", "text=warble+one", Some(&cookie)).await;

    let uid = user_id(&state, "testuser");
    let res = get(&app, &format!("/users/{uid}"), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("warble one"));

    let res = get(&app, "/users/99222224", None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn follow_and_unfollow() {
    let (app, state) = test_app();
    let cookie = signup(&app, "alice", "alice@test.com").await;
    signup(&app, "bob", "bob@test.com").await;

    let alice = user_id(&state, "alice");
    let bob = user_id(&state, "bob");

    let res = post_form(&app, &format!("/users/follow/{bob}"), "", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::FOUND);

    // Asymmetric: alice follows bob, not the other way around
    assert!(state.db.is_following(alice, bob).unwrap());
    assert!(!state.db.is_following(bob, alice).unwrap());

    let res = get(&app, &format!("/users/{alice}/following"), Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("@bob"));

    let res = post_form(
        &app,
        &format!("/users/stop-following/{bob}"),
        "",
        Some(&cookie),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert!(!state.db.is_following(alice, bob).unwrap());
}

#[tokio::test]
async fn follow_pages_require_a_session() {
    let (app, state) = test_app();
    signup(&app, "alice", "alice@test.com").await;
    let alice = user_id(&state, "alice");

    let res = get(&app, &format!("/users/{alice}/following"), None).await;
    let page = follow_redirect(&app, res, None).await;
    assert!(body_text(page).await.contains("Access unauthorized"));
}

#[tokio::test]
async fn self_follow_is_refused() {
    let (app, state) = test_app();
    let cookie = signup(&app, "alice", "alice@test.com").await;
    let alice = user_id(&state, "alice");

    let res = post_form(&app, &format!("/users/follow/{alice}"), "", Some(&cookie)).await;
    let page = follow_redirect(&app, res, Some(&cookie)).await;
    assert!(body_text(page).await.contains("Access unauthorized"));
    assert!(!state.db.is_following(alice, alice).unwrap());
}

#[tokio::test]
async fn like_toggles_on_and_off() {
    let (app, state) = test_app();
    let bob_cookie = signup(&app, "bob", "bob@test.com").await;
    post_form(&app, "/messages/new", "text=likeable", Some(&bob_cookie)).await;

    let alice_cookie = signup(&app, "alice", "alice@test.com").await;
    let alice = user_id(&state, "alice");
    let msg_id = state.db.messages_for_user(user_id(&state, "bob")).unwrap()[0].id;

    let res = post_form(
        &app,
        &format!("/users/add_like/{msg_id}"),
        "",
        Some(&alice_cookie),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert!(state.db.likes_message(alice, msg_id).unwrap());

    // Second like takes it back
    let res = post_form(
        &app,
        &format!("/users/add_like/{msg_id}"),
        "",
        Some(&alice_cookie),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert!(!state.db.likes_message(alice, msg_id).unwrap());
}

#[tokio::test]
async fn liking_your_own_message_is_refused() {
    let (app, state) = test_app();
    let cookie = signup(&app, "bob", "bob@test.com").await;
    post_form(&app, "/messages/new", "text=mine", Some(&cookie)).await;

    let bob = user_id(&state, "bob");
    let msg_id = state.db.messages_for_user(bob).unwrap()[0].id;

    let res = post_form(&app, &format!("/users/add_like/{msg_id}"), "", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("Access unauthorized"));
    assert!(!state.db.likes_message(bob, msg_id).unwrap());
}

#[tokio::test]
async fn profile_update_reauthenticates() {
    let (app, state) = test_app();
    let cookie = signup(&app, "testuser", "test@test.com").await;
    let uid = user_id(&state, "testuser");

    // Wrong current password changes nothing
    let body = "username=renamed&email=test@test.com&password=WRONG";
    let res = post_form(&app, "/users/profile", body, Some(&cookie)).await;
    let page = follow_redirect(&app, res, Some(&cookie)).await;
    assert!(body_text(page).await.contains("Access unauthorized"));
    assert_eq!(
        state.db.get_user_by_id(uid).unwrap().unwrap().username,
        "testuser"
    );

    // Correct password applies the edit
    let body = "username=renamed&email=test@test.com&password=password";
    let res = post_form(&app, "/users/profile", body, Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(
        state.db.get_user_by_id(uid).unwrap().unwrap().username,
        "renamed"
    );
}

#[tokio::test]
async fn delete_account_cascades_and_logs_out() {
    let (app, state) = test_app();
    let cookie = signup(&app, "testuser", "test@test.com").await;
    post_form(&app, "/messages/new", "text=gone+soon", Some(&cookie)).await;
    let uid = user_id(&state, "testuser");

    let res = post_form(&app, "/users/delete", "", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::FOUND);

    assert!(state.db.get_user_by_id(uid).unwrap().is_none());
    assert!(state.db.messages_for_user(uid).unwrap().is_empty());
}
