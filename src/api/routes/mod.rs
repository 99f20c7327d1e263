//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`jobs`] — Job management (start, progress, pause/resume, result, cancel)
//! - [`system`] — Health, events, OpenAPI, shutdown

use serde::{Deserialize, Serialize};

mod jobs;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use jobs::*;
pub use system::*;

// ============================================================================
// Request/Response Types (shared across handlers)
// ============================================================================

/// Request body for POST /jobs
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct StartJobRequest {
    /// Identifier of the source document (alphanumeric)
    pub source_id: String,
}

/// Response body for POST /jobs
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct JobCreated {
    /// ID of the newly created job
    pub id: crate::types::JobId,
}
