use super::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::time::Duration;
use tower::ServiceExt;

mod jobs;

/// Helper to create a test FlipbookDownloader instance wrapped in Arc
fn create_test_downloader() -> Arc<FlipbookDownloader> {
    let mut config = Config::default();
    // Point at a closed local port; API-level tests never reach the network
    config.source.base_url = "http://127.0.0.1:1".to_string();
    Arc::new(FlipbookDownloader::new(config).expect("downloader"))
}

/// Build a router around a fresh test downloader
fn test_router() -> (Router, Arc<FlipbookDownloader>) {
    let downloader = create_test_downloader();
    let config = downloader.config.clone();
    (create_router(downloader.clone(), config), downloader)
}

/// Collect a response body into bytes
async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec()
}

#[tokio::test]
async fn test_api_server_spawns() {
    let downloader = create_test_downloader();
    let mut config = (*downloader.config).clone();
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap(); // Port 0 = OS assigns a free port
    let config = Arc::new(config);

    let api_handle = tokio::spawn({
        let downloader = downloader.clone();
        let config = config.clone();
        async move { start_api_server(downloader, config).await }
    });

    // Give it a moment to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    api_handle.abort();
}

#[tokio::test]
async fn test_shutdown_stops_api_server() {
    let downloader = create_test_downloader();
    let mut config = (*downloader.config).clone();
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap();
    let config = Arc::new(config);

    let api_handle = tokio::spawn({
        let downloader = downloader.clone();
        let config = config.clone();
        async move { start_api_server(downloader, config).await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    downloader.shutdown();

    let result = tokio::time::timeout(Duration::from_secs(5), api_handle)
        .await
        .expect("server did not stop after shutdown")
        .expect("server task panicked");
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cors_enabled() {
    let downloader = create_test_downloader();
    let mut config = (*downloader.config).clone();
    config.server.api.cors_enabled = true;
    config.server.api.cors_origins = vec!["*".to_string()];
    let config = Arc::new(config);

    let app = create_router(downloader, config);

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers().contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let downloader = create_test_downloader();
    let mut config = (*downloader.config).clone();
    config.server.api.cors_enabled = false;
    let config = Arc::new(config);

    let app = create_router(downloader, config);

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key("access-control-allow-origin"));
}
