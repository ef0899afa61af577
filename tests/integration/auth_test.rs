//! Registration and login flow.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{PASSWORD, TestApp, email_of};

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_register_creates_pending_account() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/auth/register",
            Some(json!({
                "name": "Nadia",
                "email": "Nadia@Example.com",
                "password": PASSWORD,
                "password_confirmation": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["data"]["email"], "nadia@example.com");
    assert!(response.body["data"]["email_verified_at"].is_null());
    assert!(response.body["data"].get("password_hash").is_none());

    let login = app
        .request(
            "POST",
            "/auth/login",
            Some(json!({ "email": "nadia@example.com", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_register_rejects_duplicate_email() {
    let app = TestApp::new().await;
    app.create_user("Omar", "user", true).await;

    let response = app
        .request(
            "POST",
            "/auth/register",
            Some(json!({
                "name": "Omar Again",
                "email": email_of("Omar"),
                "password": PASSWORD,
                "password_confirmation": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["message"],
        "The email has already been taken."
    );
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_register_rejects_mismatched_confirmation() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/auth/register",
            Some(json!({
                "name": "Priya",
                "email": "priya@example.com",
                "password": PASSWORD,
                "password_confirmation": "something-else",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.count("users").await, 0);
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_login_and_me() {
    let app = TestApp::new().await;
    let (id, token) = app.signed_in("Quinn", "admin").await;

    let response = app.request("GET", "/auth/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["id"], id.to_string());
    assert_eq!(response.body["data"]["role_name"], "admin");
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_login_failures_share_a_message() {
    let app = TestApp::new().await;
    app.create_user("Rosa", "user", true).await;

    let wrong_password = app
        .request(
            "POST",
            "/auth/login",
            Some(json!({ "email": email_of("Rosa"), "password": "wrong-password" })),
            None,
        )
        .await;
    let unknown_email = app
        .request(
            "POST",
            "/auth/login",
            Some(json!({ "email": "nobody@docportal.test", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body["message"], unknown_email.body["message"]);
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_token_of_deleted_user_is_rejected() {
    let app = TestApp::new().await;
    let (id, token) = app.signed_in("Sami", "user").await;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&app.db_pool)
        .await
        .expect("delete user");

    let response = app.request("GET", "/auth/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
