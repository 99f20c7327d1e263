//! Job management handlers.

use super::{JobCreated, StartJobRequest};
use crate::api::AppState;
use crate::document;
use crate::types::JobId;
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// GET /jobs - List all jobs
#[utoipa::path(
    get,
    path = "/jobs",
    tag = "jobs",
    responses(
        (status = 200, description = "List of all jobs, newest first", body = Vec<crate::types::JobView>)
    )
)]
pub async fn list_jobs(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.downloader.all_jobs())
}

/// POST /jobs - Start a new download job
#[utoipa::path(
    post,
    path = "/jobs",
    tag = "jobs",
    request_body = StartJobRequest,
    responses(
        (status = 201, description = "Job created", body = JobCreated),
        (status = 400, description = "Invalid source id"),
        (status = 503, description = "Shutting down, not accepting new jobs")
    )
)]
pub async fn start_job(
    State(state): State<AppState>,
    Json(request): Json<StartJobRequest>,
) -> Response {
    match state.downloader.start(&request.source_id) {
        Ok(id) => (StatusCode::CREATED, Json(JobCreated { id })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /jobs/:id - Get job progress
#[utoipa::path(
    get,
    path = "/jobs/{id}",
    tag = "jobs",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Current job state", body = crate::types::JobView),
        (status = 404, description = "Job not found")
    )
)]
pub async fn get_job(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.downloader.progress(JobId::new(id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /jobs/:id/pause - Pause a job
#[utoipa::path(
    post,
    path = "/jobs/{id}/pause",
    tag = "jobs",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job paused", body = crate::types::JobView),
        (status = 404, description = "Job not found")
    )
)]
pub async fn pause_job(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.downloader.set_paused(JobId::new(id), true) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /jobs/:id/resume - Resume a paused job
#[utoipa::path(
    post,
    path = "/jobs/{id}/resume",
    tag = "jobs",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job resumed", body = crate::types::JobView),
        (status = 404, description = "Job not found")
    )
)]
pub async fn resume_job(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.downloader.set_paused(JobId::new(id), false) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /jobs/:id/result - Download the assembled document
#[utoipa::path(
    get,
    path = "/jobs/{id}/result",
    tag = "jobs",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Assembled PDF document", content_type = "application/pdf"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Job not finished yet")
    )
)]
pub async fn job_result(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.downloader.fetch_result(JobId::new(id)) {
        Ok((bytes, title)) => {
            // Title is already sanitized; no quotes or control chars survive
            let disposition = format!(
                "attachment; filename=\"{title}.{}\"",
                document::DOCUMENT_EXTENSION
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, document::DOCUMENT_MIME.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// DELETE /jobs/:id - Cancel/remove a job
#[utoipa::path(
    delete,
    path = "/jobs/{id}",
    tag = "jobs",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 204, description = "Job removed"),
        (status = 404, description = "Job not found")
    )
)]
pub async fn delete_job(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.downloader.cancel(JobId::new(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
