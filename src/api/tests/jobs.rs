//! Tests for the job management routes.

use super::*;
use serde_json::Value;

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn start_test_job(app: &Router) -> i64 {
    let response = app
        .clone()
        .oneshot(post_json("/jobs", r#"{"source_id":"abc123"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_start_job_returns_created() {
    let (app, _downloader) = test_router();
    let id = start_test_job(&app).await;
    assert!(id >= 1);
}

#[tokio::test]
async fn test_start_job_rejects_invalid_source_id() {
    let (app, _downloader) = test_router();

    let response = app
        .oneshot(post_json("/jobs", r#"{"source_id":"../etc"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_start_job_rejected_during_shutdown() {
    let (app, downloader) = test_router();
    downloader.shutdown();

    let response = app
        .oneshot(post_json("/jobs", r#"{"source_id":"abc123"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"]["code"], "shutting_down");
}

#[tokio::test]
async fn test_get_job_returns_view() {
    let (app, _downloader) = test_router();
    let id = start_test_job(&app).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/jobs/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["id"].as_i64().unwrap(), id);
    assert_eq!(body["source_id"], "abc123");
    assert!(body["status"].is_string());
}

#[tokio::test]
async fn test_get_unknown_job_is_not_found() {
    let (app, _downloader) = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/jobs/9999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_list_jobs_includes_started_job() {
    let (app, _downloader) = test_router();
    let id = start_test_job(&app).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/jobs")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    let jobs = body.as_array().unwrap();
    assert!(jobs.iter().any(|j| j["id"].as_i64() == Some(id)));
}

#[tokio::test]
async fn test_pause_and_resume_job() {
    let (app, _downloader) = test_router();
    let id = start_test_job(&app).await;

    let response = app
        .clone()
        .oneshot(post_json(&format!("/jobs/{id}/pause"), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["paused"], true);

    let response = app
        .oneshot(post_json(&format!("/jobs/{id}/resume"), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["paused"], false);
}

#[tokio::test]
async fn test_pause_unknown_job_is_not_found() {
    let (app, _downloader) = test_router();

    let response = app
        .oneshot(post_json("/jobs/9999/pause", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_result_before_done_is_conflict() {
    let (app, _downloader) = test_router();
    let id = start_test_job(&app).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/jobs/{id}/result"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"]["code"], "not_ready");
}

#[tokio::test]
async fn test_result_headers_for_finished_job() {
    let (app, downloader) = test_router();

    // Finish a job by hand; the pipeline itself is covered elsewhere
    let (job_id, _gate) = downloader.registry.create("abc123");
    downloader.registry.set_manifest(job_id, "My Book", 1);
    downloader
        .registry
        .store_result(job_id, b"%PDF-stub".to_vec());
    let id = job_id.get();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/jobs/{id}/result"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers().clone();
    assert_eq!(headers["content-type"], "application/pdf");
    assert_eq!(
        headers["content-disposition"],
        "attachment; filename=\"My Book.pdf\""
    );
    assert_eq!(body_bytes(response).await, b"%PDF-stub");
}

#[tokio::test]
async fn test_delete_job_removes_it() {
    let (app, _downloader) = test_router();
    let id = start_test_job(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/jobs/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/jobs/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
