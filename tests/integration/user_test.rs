//! Admin user management under `/manage-user`.

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::helpers::{PASSWORD, TestApp, email_of};

async fn role_id(app: &TestApp, name: &str) -> Uuid {
    sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
        .bind(name)
        .fetch_one(&app.db_pool)
        .await
        .expect("seeded role")
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_non_admin_is_forbidden() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("Mia", "user").await;

    let response = app.request("GET", "/manage-user", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_create_list_verify_update() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("Noor", "admin").await;
    let user_role = role_id(&app, "user").await;

    let created = app
        .request(
            "POST",
            "/manage-user",
            Some(json!({
                "name": "Otto",
                "email": "otto@docportal.test",
                "password": PASSWORD,
                "password_confirmation": PASSWORD,
                "role_id": user_role,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
    let otto: Uuid = created.body["data"]["id"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("created id");
    assert!(created.body["data"]["email_verified_at"].is_null());

    let listing = app.request("GET", "/manage-user", None, Some(&token)).await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.body["data"]["users"]["total"], 2);
    assert_eq!(
        listing.body["data"]["roles"].as_array().map(Vec::len),
        Some(2)
    );

    let verified = app
        .request(
            "POST",
            &format!("/manage-user/{otto}/verify"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(verified.status, StatusCode::OK);
    assert!(!verified.body["data"]["email_verified_at"].is_null());
    app.login("otto@docportal.test", PASSWORD).await;

    let updated = app
        .request(
            "PATCH",
            &format!("/manage-user/{otto}"),
            Some(json!({ "name": "Otto Renamed" })),
            Some(&token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["name"], "Otto Renamed");
    assert_eq!(updated.body["data"]["email"], "otto@docportal.test");
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_update_rejects_taken_email() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("Pia", "admin").await;
    let other = app.create_user("Quin", "user", true).await;

    let response = app
        .request(
            "PUT",
            &format!("/manage-user/{other}"),
            Some(json!({ "email": email_of("Pia") })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_self_delete_is_refused() {
    let app = TestApp::new().await;
    let (id, token) = app.signed_in("Rey", "admin").await;

    let response = app
        .request("DELETE", &format!("/manage-user/{id}"), None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["message"], "You cannot delete your own account.");
    assert_eq!(app.count("users").await, 1);
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_delete_cascades_to_owned_documents() {
    let app = TestApp::new().await;
    let (_, admin) = app.signed_in("Sol", "admin").await;
    let (owner, owner_token) = app.signed_in("Tess", "admin").await;

    let folder = app
        .request(
            "POST",
            "/system-owner/rm/create-folder",
            Some(json!({ "folder_name": "Tess docs" })),
            Some(&owner_token),
        )
        .await;
    let folder_id: Uuid = folder.body["data"]["id"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("folder id");
    app.upload("rm", &owner_token, Some(folder_id), "in.pdf", b"1")
        .await;
    app.upload("dpp", &owner_token, None, "loose.pdf", b"2").await;
    app.upload("dpp", &admin, None, "admin.pdf", b"3").await;
    let before = app.storage_paths().await;
    assert_eq!(before.len(), 3);

    let response = app
        .request("DELETE", &format!("/manage-user/{owner}"), None, Some(&admin))
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(app.count("users").await, 1);
    assert_eq!(app.count("folders").await, 0);
    assert_eq!(app.count("files").await, 1);
    assert_eq!(app.count("activity_logs").await, 1);

    let after = app.storage_paths().await;
    assert_eq!(after.len(), 1);
    for path in &before {
        assert_eq!(app.blob_exists(path), after.contains(path), "blob {path}");
    }
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_bulk_delete_skips_actor() {
    let app = TestApp::new().await;
    let (actor, token) = app.signed_in("Uma", "admin").await;
    let x = app.create_user("Vik", "user", false).await;
    let y = app.create_user("Wen", "user", true).await;

    let response = app
        .request(
            "POST",
            "/manage-user/bulk-delete",
            Some(json!({ "user_ids": [x, y, actor] })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["deleted"], 2);
    assert_eq!(response.body["message"], "2 user(s) deleted successfully.");
    assert_eq!(app.count("users").await, 1);
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_bulk_delete_of_only_self_is_refused() {
    let app = TestApp::new().await;
    let (actor, token) = app.signed_in("Xia", "admin").await;

    let response = app
        .request(
            "POST",
            "/manage-user/bulk-delete",
            Some(json!({ "user_ids": [actor] })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.body["message"],
        "No valid users selected for deletion."
    );
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_out_of_range_and_empty_pages() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("Yara", "admin").await;

    let far = app
        .request(
            "GET",
            "/manage-user?page=9223372036854775807",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(far.status, StatusCode::OK, "{:?}", far.body);
    assert_eq!(far.body["data"]["users"]["total"], 1);
    assert_eq!(far.body["data"]["users"]["data"], json!([]));

    let activity = app
        .request(
            "GET",
            "/activity-logs?page=9223372036854775807&user_id=",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(activity.status, StatusCode::OK, "{:?}", activity.body);

    let empty = app
        .request("GET", "/manage-user?page=", None, Some(&token))
        .await;
    assert_eq!(empty.status, StatusCode::OK, "{:?}", empty.body);
    assert_eq!(empty.body["data"]["users"]["current_page"], 1);

    let root = app
        .request(
            "GET",
            "/system-owner/dpp?folder_id=&page=9223372036854775807",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(root.status, StatusCode::OK, "{:?}", root.body);
    assert_eq!(root.body["data"]["documents"]["data"], json!([]));
}
