//! Activity log browsing.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_activity_log_lists_uploads_and_downloads() {
    let app = TestApp::new().await;
    let (admin_id, token) = app.signed_in("Yara", "admin").await;

    let uploaded = app.upload("dpp", &token, None, "log.csv", b"a,b").await;
    let file_id = uploaded.body["data"]["id"].as_str().expect("file id").to_string();
    let download = app
        .request(
            "GET",
            &format!("/system-owner/download/{file_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(download.status, StatusCode::OK);

    let all = app.request("GET", "/activity-logs", None, Some(&token)).await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body["data"]["total"], 2);
    assert_eq!(all.body["data"]["data"][0]["action"], "download");
    assert_eq!(all.body["data"]["data"][0]["file_name"], "log.csv");
    assert_eq!(all.body["data"]["data"][0]["user_id"], admin_id.to_string());

    let uploads = app
        .request("GET", "/activity-logs?action=upload", None, Some(&token))
        .await;
    assert_eq!(uploads.body["data"]["total"], 1);

    let bad = app
        .request("GET", "/activity-logs?action=delete", None, Some(&token))
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_activity_log_is_admin_only() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("Zed", "user").await;

    let response = app.request("GET", "/activity-logs", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
