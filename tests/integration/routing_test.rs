//! Requests rejected before any query runs.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::offline().await;

    for path in ["/auth/me", "/system-owner/dpp", "/manage-user", "/activity-logs"] {
        let response = app.request("GET", path, None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{path}");
        assert_eq!(response.body["success"], false);
        assert_eq!(response.body["error"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let app = TestApp::offline().await;

    let response = app
        .request("GET", "/auth/me", None, Some("not-a-jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(
        response.body["message"]
            .as_str()
            .unwrap_or_default()
            .starts_with("Invalid token")
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::offline().await;

    let response = app.request("GET", "/does-not-exist", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let app = TestApp::offline().await;

    let response = app.request("PUT", "/auth/login", None, None).await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}
