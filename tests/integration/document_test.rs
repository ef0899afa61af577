//! Document listing and mutation under `/system-owner`.

use axum::http::{StatusCode, header};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::helpers::TestApp;

async fn create_folder(app: &TestApp, token: &str, name: &str, parent: Option<Uuid>) -> Uuid {
    let response = app
        .request(
            "POST",
            "/system-owner/dpp/create-folder",
            Some(json!({ "folder_name": name, "parent_id": parent })),
            Some(token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    id_of(&response.body["data"])
}

fn id_of(value: &Value) -> Uuid {
    value["id"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("response has an id")
}

fn names(listing: &Value) -> Vec<String> {
    listing["data"]["documents"]["data"]
        .as_array()
        .expect("documents page")
        .iter()
        .map(|entry| entry["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_folder_size_aggregates_descendants() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("Ava", "admin").await;

    let a = create_folder(&app, &token, "A", None).await;
    let b = create_folder(&app, &token, "B", Some(a)).await;
    let report = app
        .upload("dpp", &token, Some(a), "report.pdf", &vec![0u8; 500_000])
        .await;
    assert_eq!(report.status, StatusCode::CREATED, "{:?}", report.body);
    let notes = app
        .upload("dpp", &token, Some(b), "notes.txt", &vec![b'n'; 1_500])
        .await;
    assert_eq!(notes.status, StatusCode::CREATED);

    let root = app.request("GET", "/system-owner/dpp", None, Some(&token)).await;
    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(names(&root.body), vec!["A"]);
    let folder = &root.body["data"]["documents"]["data"][0];
    assert_eq!(folder["type"], "folder");
    assert_eq!(folder["size"], "489.75 KB");
    assert_eq!(folder["size_bytes"], 501_500);

    let inside = app
        .request(
            "GET",
            &format!("/system-owner/dpp?folder_id={a}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(names(&inside.body), vec!["B", "report.pdf"]);
    let crumbs = inside.body["data"]["breadcrumbs"]
        .as_array()
        .expect("breadcrumbs");
    assert_eq!(crumbs.len(), 1);
    assert_eq!(crumbs[0]["name"], "A");

    let nested = app
        .request(
            "GET",
            &format!("/system-owner/dpp?folder_id={b}"),
            None,
            Some(&token),
        )
        .await;
    let crumbs: Vec<&str> = nested.body["data"]["breadcrumbs"]
        .as_array()
        .expect("breadcrumbs")
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(crumbs, vec!["A", "B"]);
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_listing_filters_and_menus_are_separate() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("Ben", "admin").await;

    app.upload("dpp", &token, None, "budget.xlsx", b"xlsx").await;
    app.upload("dpp", &token, None, "minutes.pdf", b"pdf").await;
    app.upload("rm", &token, None, "risk.pdf", b"pdf").await;
    create_folder(&app, &token, "Archive", None).await;

    let all = app.request("GET", "/system-owner/dpp", None, Some(&token)).await;
    assert_eq!(names(&all.body), vec!["Archive", "budget.xlsx", "minutes.pdf"]);

    let pdfs = app
        .request("GET", "/system-owner/dpp?type=pdf", None, Some(&token))
        .await;
    assert_eq!(names(&pdfs.body), vec!["Archive", "minutes.pdf"]);

    let folders = app
        .request("GET", "/system-owner/dpp?type=folder", None, Some(&token))
        .await;
    assert_eq!(names(&folders.body), vec!["Archive"]);

    let search = app
        .request("GET", "/system-owner/dpp?search=bud", None, Some(&token))
        .await;
    assert_eq!(names(&search.body), vec!["budget.xlsx"]);

    let rm = app.request("GET", "/system-owner/rm", None, Some(&token)).await;
    assert_eq!(names(&rm.body), vec!["risk.pdf"]);
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_unknown_menu_and_type() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("Cleo", "admin").await;

    let menu = app.request("GET", "/system-owner/cbm", None, Some(&token)).await;
    assert_eq!(menu.status, StatusCode::NOT_FOUND);

    let entry = app
        .request(
            "DELETE",
            &format!("/system-owner/dpp/{}/dir", Uuid::new_v4()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(entry.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_regular_user_reads_but_cannot_write() {
    let app = TestApp::new().await;
    let (_, admin) = app.signed_in("Dana", "admin").await;
    let (_, user) = app.signed_in("Eli", "user").await;

    let uploaded = app.upload("psm", &admin, None, "policy.docx", b"docx").await;
    let file_id = id_of(&uploaded.body["data"]);

    let listing = app.request("GET", "/system-owner/psm", None, Some(&user)).await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.body["data"]["documents"]["data"][0]["can_delete"], false);

    let folder = app
        .request(
            "POST",
            "/system-owner/psm/create-folder",
            Some(json!({ "folder_name": "Mine" })),
            Some(&user),
        )
        .await;
    assert_eq!(folder.status, StatusCode::FORBIDDEN);

    let upload = app.upload("psm", &user, None, "mine.pdf", b"pdf").await;
    assert_eq!(upload.status, StatusCode::FORBIDDEN);

    let delete = app
        .request(
            "DELETE",
            &format!("/system-owner/psm/{file_id}/file"),
            None,
            Some(&user),
        )
        .await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);
    assert_eq!(app.count("files").await, 1);
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_upload_rejects_unsupported_type() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("Finn", "admin").await;

    let response = app.upload("dpp", &token, None, "script.exe", b"MZ").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.count("files").await, 0);
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_upload_into_folder_of_other_menu_is_rejected() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("Gia", "admin").await;
    let folder = create_folder(&app, &token, "Elsewhere", None).await;

    let response = app
        .upload("rm", &token, Some(folder), "a.pdf", b"pdf")
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_download_streams_content_and_logs_activity() {
    let app = TestApp::new().await;
    let (_, admin) = app.signed_in("Hana", "admin").await;
    let (_, user) = app.signed_in("Ivo", "user").await;

    let uploaded = app
        .upload("lccm", &admin, None, "plan v2.txt", b"hello portal")
        .await;
    let file_id = id_of(&uploaded.body["data"]);

    let response = app
        .request(
            "GET",
            &format!("/system-owner/download/{file_id}"),
            None,
            Some(&user),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.raw, b"hello portal");
    assert_eq!(response.headers[header::CONTENT_TYPE], "text/plain");
    assert_eq!(
        response.headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"plan v2.txt\"; filename*=UTF-8''plan%20v2.txt"
    );

    let downloads: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM activity_logs WHERE action = 'download'")
            .fetch_one(&app.db_pool)
            .await
            .expect("count downloads");
    assert_eq!(downloads, 1);
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_rename_entries() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("Jon", "admin").await;
    let folder = create_folder(&app, &token, "Drafts", None).await;
    let file = app.upload("dpp", &token, None, "old.pdf", b"pdf").await;
    let file_id = id_of(&file.body["data"]);

    let renamed = app
        .request(
            "PATCH",
            &format!("/system-owner/dpp/{folder}/folder/update"),
            Some(json!({ "name": "  Final  " })),
            Some(&token),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["data"]["name"], "Final");
    assert_eq!(renamed.body["message"], "Folder renamed successfully");

    let renamed = app
        .request(
            "PATCH",
            &format!("/system-owner/dpp/{file_id}/file/update"),
            Some(json!({ "name": "new.pdf" })),
            Some(&token),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["message"], "File renamed successfully");

    let wrong_menu = app
        .request(
            "PATCH",
            &format!("/system-owner/rm/{file_id}/file/update"),
            Some(json!({ "name": "x.pdf" })),
            Some(&token),
        )
        .await;
    assert_eq!(wrong_menu.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_folder_delete_removes_subtree_only() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("Kai", "admin").await;

    let keep = create_folder(&app, &token, "Keep", None).await;
    let gone = create_folder(&app, &token, "Gone", Some(keep)).await;
    let child = create_folder(&app, &token, "Child", Some(gone)).await;
    app.upload("dpp", &token, Some(keep), "kept.pdf", b"k").await;
    app.upload("dpp", &token, Some(gone), "a.pdf", b"a").await;
    app.upload("dpp", &token, Some(child), "b.pdf", b"b").await;
    let before = app.storage_paths().await;
    assert_eq!(before.len(), 3);
    assert!(before.iter().all(|path| app.blob_exists(path)));

    let response = app
        .request(
            "DELETE",
            &format!("/system-owner/dpp/{gone}/folder"),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["folders"], 2);
    assert_eq!(response.body["data"]["files"], 2);
    assert_eq!(app.count("folders").await, 1);
    assert_eq!(app.count("files").await, 1);

    let after = app.storage_paths().await;
    for path in &before {
        assert_eq!(app.blob_exists(path), after.contains(path), "blob {path}");
    }

    let remaining = app
        .request(
            "GET",
            &format!("/system-owner/dpp?folder_id={keep}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(names(&remaining.body), vec!["kept.pdf"]);
}

#[tokio::test]
#[ignore = "requires DOCPORTAL_TEST_DATABASE_URL"]
async fn test_listing_paginates_by_ten() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("Lia", "admin").await;
    for i in 0..12 {
        app.upload("dpp", &token, None, &format!("doc{i:02}.txt"), b"x")
            .await;
    }

    let page = app
        .request("GET", "/system-owner/dpp?page=2", None, Some(&token))
        .await;

    let documents = &page.body["data"]["documents"];
    assert_eq!(documents["total"], 12);
    assert_eq!(documents["last_page"], 2);
    assert_eq!(names(&page.body), vec!["doc10.txt", "doc11.txt"]);
}
