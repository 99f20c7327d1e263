//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the flipbook-dl REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the flipbook-dl REST API
///
/// This struct is used to generate the OpenAPI 3.1 specification that describes
/// all available endpoints, request/response types, and API behavior.
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "flipbook-dl REST API",
        version = "0.1.0",
        description = "REST API for downloading online flipbook documents and reassembling them into PDFs",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:7474", description = "Local development server")
    ),
    paths(
        // Jobs
        crate::api::routes::list_jobs,
        crate::api::routes::start_job,
        crate::api::routes::get_job,
        crate::api::routes::pause_job,
        crate::api::routes::resume_job,
        crate::api::routes::job_result,
        crate::api::routes::delete_job,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
        crate::api::routes::shutdown,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::JobId,
        crate::types::Status,
        crate::types::JobView,
        crate::types::Event,

        // Config types from config.rs
        crate::config::Config,
        crate::config::SourceConfig,
        crate::config::ProcessingConfig,
        crate::config::ApiConfig,
        crate::config::ServerConfig,

        // Request/response types from routes
        crate::api::routes::StartJobRequest,
        crate::api::routes::JobCreated,
    )),
    tags(
        (name = "jobs", description = "Download job management"),
        (name = "system", description = "Health, events and lifecycle")
    )
)]
pub struct ApiDoc;
