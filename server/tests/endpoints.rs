use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tempfile::tempdir;
use tower::ServiceExt;

use timer_sounds_core::{AssetStore, FsAssetStore, MemoryAssetStore};
use timer_sounds_server::{AppState, build_router};
use timer_sounds_types::ServerConfig;

const BOUNDARY: &str = "timer-sounds-test-boundary";

fn router_with(store: Arc<dyn AssetStore>) -> Router {
    build_router(AppState::new(store, &ServerConfig::default()))
}

fn multipart_body(field: &str, files: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, content) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: audio/mpeg\r\n\r\n");
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(field: &str, files: &[(&str, &str)]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field, files)))
        .unwrap()
}

fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, req).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn list(app: &Router) -> Vec<String> {
    let (status, body) = send_json(app, request(Method::GET, "/sounds")).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn upload_list_delete_round() {
    let dir = tempdir().unwrap();
    let store = FsAssetStore::open(dir.path()).await.unwrap();
    let app = router_with(Arc::new(store));

    let (status, body) = send_json(
        &app,
        upload_request("sounds", &[("bell.mp3", "bell"), ("gong.wav", "gong")]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let names = list(&app).await;
    assert_eq!(names.len(), 2);
    assert!(names.iter().any(|n| n.ends_with("-bell.mp3")));
    assert!(names.iter().any(|n| n.ends_with("-gong.wav")));

    let (gone, kept) = (&names[0], &names[1]);
    let (status, body) = send_json(&app, request(Method::DELETE, &format!("/delete/{gone}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    assert_eq!(list(&app).await, vec![kept.clone()]);
    assert!(!dir.path().join(gone).exists());
}

#[tokio::test]
async fn random_on_empty_store_is_404() {
    let app = router_with(Arc::new(MemoryAssetStore::new()));

    let (status, body) = send_json(&app, request(Method::GET, "/random")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn random_returns_a_listed_name() {
    let app = router_with(Arc::new(MemoryAssetStore::new()));
    send(&app, upload_request("sounds", &[("a.mp3", "a"), ("b.mp3", "b")])).await;
    let names = list(&app).await;

    for _ in 0..10 {
        let (status, body) = send_json(&app, request(Method::GET, "/random")).await;
        assert_eq!(status, StatusCode::OK);
        let file = body["file"].as_str().unwrap().to_string();
        assert!(names.contains(&file));
    }
}

#[tokio::test]
async fn retrieve_serves_raw_bytes() {
    let app = router_with(Arc::new(MemoryAssetStore::new()));
    send(&app, upload_request("sounds", &[("tone.mp3", "\x01\x02\x03\x04")])).await;
    let name = list(&app).await.remove(0);

    let response = app
        .clone()
        .oneshot(request(Method::GET, &format!("/uploads/{name}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body.as_ref(), b"\x01\x02\x03\x04");
}

#[tokio::test]
async fn retrieve_missing_is_404() {
    let app = router_with(Arc::new(MemoryAssetStore::new()));
    let (status, _) = send(&app, request(Method::GET, "/uploads/1-missing.mp3")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_missing_is_404_every_time() {
    let app = router_with(Arc::new(MemoryAssetStore::new()));
    send(&app, upload_request("sounds", &[("a.mp3", "a")])).await;
    let name = list(&app).await.remove(0);

    let uri = format!("/delete/{name}");
    let (status, _) = send(&app, request(Method::DELETE, &uri)).await;
    assert_eq!(status, StatusCode::OK);

    for _ in 0..2 {
        let (status, body) = send_json(&app, request(Method::DELETE, &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn url_encoded_names_are_decoded() {
    let app = router_with(Arc::new(MemoryAssetStore::new()));
    send(&app, upload_request("sounds", &[("my song.mp3", "x")])).await;
    let name = list(&app).await.remove(0);
    assert!(name.ends_with("-my song.mp3"));

    let encoded = name.replace(' ', "%20");
    let (status, _) = send(&app, request(Method::DELETE, &format!("/delete/{encoded}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn traversal_names_are_404() {
    let dir = tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    std::fs::write(dir.path().join("secret.txt"), b"secret").unwrap();
    let app = router_with(Arc::new(FsAssetStore::open(&uploads).await.unwrap()));

    let (status, _) = send(&app, request(Method::GET, "/uploads/..%2Fsecret.txt")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, request(Method::DELETE, "/delete/..%2Fsecret.txt")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(dir.path().join("secret.txt").exists());
}

#[tokio::test]
async fn retrieve_directory_is_404() {
    let dir = tempdir().unwrap();
    let store = FsAssetStore::open(dir.path()).await.unwrap();
    std::fs::create_dir(dir.path().join("1-folder")).unwrap();
    let app = router_with(Arc::new(store));

    let (status, _) = send(&app, request(Method::GET, "/uploads/1-folder")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn delete_storage_failure_is_500() {
    let dir = tempdir().unwrap();
    let store = FsAssetStore::open(dir.path()).await.unwrap();
    std::fs::create_dir(dir.path().join("1-folder")).unwrap();
    let app = router_with(Arc::new(store));

    let (status, body) = send_json(&app, request(Method::DELETE, "/delete/1-folder")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn upload_accepts_twenty_files() {
    let app = router_with(Arc::new(MemoryAssetStore::new()));
    let names: Vec<String> = (0..20).map(|i| format!("clip{i}.mp3")).collect();
    let files: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "x")).collect();

    let (status, _) = send(&app, upload_request("sounds", &files)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list(&app).await.len(), 20);
}

#[tokio::test]
async fn upload_rejects_more_than_twenty_files() {
    let app = router_with(Arc::new(MemoryAssetStore::new()));
    let names: Vec<String> = (0..21).map(|i| format!("clip{i}.mp3")).collect();
    let files: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "x")).collect();

    let (status, body) = send_json(&app, upload_request("sounds", &files)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("20"));
    assert!(list(&app).await.is_empty(), "rejected upload stores nothing");
}

#[tokio::test]
async fn upload_ignores_other_fields() {
    let app = router_with(Arc::new(MemoryAssetStore::new()));

    let (status, _) = send(&app, upload_request("attachments", &[("a.mp3", "a")])).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn upload_without_multipart_is_400() {
    let app = router_with(Arc::new(MemoryAssetStore::new()));
    let req = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = router_with(Arc::new(MemoryAssetStore::new()));
    let req = Request::builder()
        .method(Method::GET)
        .uri("/sounds")
        .header(header::ORIGIN, "https://example.com")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
