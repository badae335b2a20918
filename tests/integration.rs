use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

use rax_file_gateway::server::build_router;
use rax_file_gateway::storage::{DirectoryEntry, FileGateway, Root};

const MAX_CONTENT_BYTES: usize = 64 * 1024;

// Helper to build an app over a fresh temporary root
fn setup_app() -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    let root = Root::new(dir.path()).unwrap();
    let gateway = FileGateway::new(root, Duration::from_secs(5));
    (dir, build_router(gateway, MAX_CONTENT_BYTES))
}

// Helper to send a request and collect status and body
async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn error_kind(body: &str) -> String {
    let value: Value = serde_json::from_str(body).unwrap();
    value["kind"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_read_update_delete_cycle() {
    let (_dir, app) = setup_app();

    let (status, body) = send(&app, Method::POST, "/files/notes.txt", Some(json!({"content": "A"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "File created successfully");

    let (status, body) = send(&app, Method::GET, "/files/notes.txt", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "A");

    let (status, body) = send(&app, Method::PUT, "/files/notes.txt", Some(json!({"content": "B"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "File updated successfully");

    let (_, body) = send(&app, Method::GET, "/files/notes.txt", None).await;
    assert_eq!(body, "B");

    let (status, body) = send(&app, Method::DELETE, "/files/notes.txt", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "File deleted successfully");

    let (status, body) = send(&app, Method::GET, "/files/notes.txt", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_kind(&body), "NotFound");
}

#[tokio::test]
async fn test_create_without_content_makes_empty_file() {
    let (dir, app) = setup_app();

    let (status, _) = send(&app, Method::POST, "/files/empty.txt", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(std::fs::read_to_string(dir.path().join("empty.txt")).unwrap(), "");

    let (status, body) = send(&app, Method::POST, "/files/empty.txt", Some(json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_kind(&body), "AlreadyExists");
}

#[tokio::test]
async fn test_list_root_and_nested_directory() {
    let (_dir, app) = setup_app();

    send(&app, Method::POST, "/files/a.txt", Some(json!({"content": ""}))).await;
    let (status, body) = send(&app, Method::POST, "/directories/b", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Directory created successfully");

    let (status, body) = send(&app, Method::GET, "/files", None).await;
    assert_eq!(status, StatusCode::OK);
    let mut entries: Vec<DirectoryEntry> = serde_json::from_str(&body).unwrap();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(
        entries,
        vec![
            DirectoryEntry { name: "a.txt".into(), is_directory: false },
            DirectoryEntry { name: "b".into(), is_directory: true },
        ]
    );

    send(&app, Method::POST, "/files/b/inner.md", Some(json!({"content": "# hi"}))).await;
    let (status, body) = send(&app, Method::GET, "/files?path=b", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(listed, json!([{"name": "inner.md", "isDirectory": false}]));

    let (_, body) = send(&app, Method::GET, "/files/b/inner.md", None).await;
    assert_eq!(body, "# hi");
}

#[tokio::test]
async fn test_list_missing_directory_is_not_found() {
    let (_dir, app) = setup_app();

    let (status, body) = send(&app, Method::GET, "/files?path=nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_kind(&body), "NotFound");
}

#[tokio::test]
async fn test_traversal_is_a_client_error() {
    let (_dir, app) = setup_app();

    let (status, body) = send(&app, Method::GET, "/files?path=..", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&body), "InvalidPath");

    let (status, body) = send(&app, Method::GET, "/files/a/%2E%2E/%2E%2E/etc/passwd", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&body), "InvalidPath");

    let (status, _) = send(&app, Method::GET, "/files?path=%2Fetc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_and_mkdir_escapes_are_client_errors() {
    let (dir, app) = setup_app();

    let (status, body) = send(&app, Method::POST, "/directories/%2E%2E/x", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&body), "InvalidPath");

    let (status, body) = send(&app, Method::POST, "/directories/%2Ftmp%2Fplanted", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&body), "InvalidPath");

    let (status, body) = send(
        &app,
        Method::POST,
        "/files/a/%2E%2E/%2E%2E/planted.txt",
        Some(json!({"content": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&body), "InvalidPath");

    let (status, body) = send(&app, Method::POST, "/files/%2Ftmp%2Fplanted.txt", Some(json!({"content": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&body), "InvalidPath");

    assert!(!dir.path().parent().unwrap().join("x").exists());
    assert!(!dir.path().parent().unwrap().join("planted.txt").exists());
}

#[tokio::test]
async fn test_read_directory_and_nested_mkdir_fail() {
    let (_dir, app) = setup_app();
    send(&app, Method::POST, "/directories/docs", None).await;

    let (status, body) = send(&app, Method::GET, "/files/docs", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_kind(&body), "NotAFile");

    let (status, body) = send(&app, Method::POST, "/directories/missingParent/child", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_kind(&body), "NotFound");
}

#[tokio::test]
async fn test_update_requires_content_field() {
    let (_dir, app) = setup_app();
    send(&app, Method::POST, "/files/a.txt", Some(json!({"content": "x"}))).await;

    let (status, _) = send(&app, Method::PUT, "/files/a.txt", Some(json!({}))).await;
    assert!(status.is_client_error());

    let (_, body) = send(&app, Method::GET, "/files/a.txt", None).await;
    assert_eq!(body, "x");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let (dir, app) = setup_app();
    let huge = "z".repeat(MAX_CONTENT_BYTES + 1);

    let (status, _) = send(&app, Method::POST, "/files/big.txt", Some(json!({"content": huge}))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!dir.path().join("big.txt").exists());
}

#[tokio::test]
async fn test_cors_preflight_is_allowed() {
    let (_dir, app) = setup_app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/files/a.txt")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn test_concurrent_requests_on_distinct_files() {
    let (_dir, app) = setup_app();

    let mut handles = Vec::new();
    for i in 0..16 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let uri = format!("/files/f{i}.txt");
            let content = format!("content {i}");
            let (status, _) = send(&app, Method::POST, &uri, Some(json!({"content": &content}))).await;
            assert_eq!(status, StatusCode::OK);
            let (_, body) = send(&app, Method::GET, &uri, None).await;
            assert_eq!(body, content);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let (_, body) = send(&app, Method::GET, "/files", None).await;
    let entries: Vec<DirectoryEntry> = serde_json::from_str(&body).unwrap();
    assert_eq!(entries.len(), 16);
}
