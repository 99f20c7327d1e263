//! Error types for flipbook-dl
//!
//! This module provides the error handling for the library, including:
//! - Domain-specific error types (manifest, page, assembly)
//! - A strict split between job-fatal and page-local failures
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes

use crate::types::{JobId, Status};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for flipbook-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for flipbook-dl
///
/// Page-local variants ([`Error::Page`]) are absorbed inside the download
/// fan-out and never terminate a job; everything else that reaches the
/// orchestrator's top level marks the job as failed.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad caller input, surfaced immediately; no job is created
    #[error("validation error: {message}")]
    Validation {
        /// Human-readable description of the invalid input
        message: String,
        /// The request field that failed validation, if known
        field: Option<String>,
    },

    /// Manifest load or parse failure (job-fatal)
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Page-local failure (absorbed; the page is dropped from the document)
    #[error("page error: {0}")]
    Page(#[from] PageError),

    /// Every page of a job failed to resolve or download (job-fatal)
    #[error("job {id}: no pages could be recovered")]
    NoPagesRecovered {
        /// The job whose fan-out produced an empty result set
        id: JobId,
    },

    /// Image normalization or document assembly failure (job-fatal)
    #[error("assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    /// Job not found in the registry
    #[error("job not found: {0}")]
    NotFound(String),

    /// Result requested before the job reached its terminal success state
    #[error("job {id} result not ready: status is {status}")]
    NotReady {
        /// The job whose result was requested
        id: JobId,
        /// The job's current status
        status: Status,
    },

    /// Shutdown in progress - not accepting new jobs
    #[error("shutdown in progress: not accepting new jobs")]
    ShuttingDown,

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Manifest load failures — always job-fatal
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Transport failure while fetching the manifest resource
    #[error("failed to fetch manifest for '{source_id}': {reason}")]
    Fetch {
        /// The book identifier whose manifest was requested
        source_id: String,
        /// The underlying transport error
        reason: String,
    },

    /// The manifest resource responded with a non-success status
    #[error("manifest for '{source_id}' returned HTTP {status}")]
    Status {
        /// The book identifier whose manifest was requested
        source_id: String,
        /// The HTTP status code returned by the remote host
        status: u16,
    },

    /// The manifest body did not match the expected script-wrapped JSON shape
    #[error("malformed manifest for '{source_id}': {reason}")]
    Format {
        /// The book identifier whose manifest was requested
        source_id: String,
        /// What about the payload was malformed
        reason: String,
    },
}

/// Page-local failures — absorbed by the fan-out, never job-fatal
#[derive(Debug, Error)]
pub enum PageError {
    /// No candidate URL passed the existence probe
    #[error("page {index}: no candidate URL resolved")]
    Unresolved {
        /// Zero-based page index
        index: u32,
    },

    /// The resolved URL responded with a non-success status
    #[error("page {index}: HTTP {status}")]
    Status {
        /// Zero-based page index
        index: u32,
        /// The HTTP status code returned by the remote host
        status: u16,
    },

    /// Transport failure before or during the body stream
    #[error("page {index}: transport error: {reason}")]
    Transport {
        /// Zero-based page index
        index: u32,
        /// The underlying transport error
        reason: String,
    },
}

/// Normalization and document-assembly failures — job-fatal
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// Downloaded page bytes are not a decodable image
    #[error("page {index} is not a decodable image: {reason}")]
    ImageDecode {
        /// Zero-based page index
        index: u32,
        /// The underlying decode error
        reason: String,
    },

    /// JPEG re-encoding failed
    #[error("failed to re-encode page {index}: {reason}")]
    Encode {
        /// Zero-based page index
        index: u32,
        /// The underlying encode error
        reason: String,
    },

    /// No pages were handed to the assembler
    #[error("cannot assemble a document with zero pages")]
    EmptyDocument,

    /// PDF serialization failed
    #[error("failed to write PDF: {reason}")]
    Pdf {
        /// The underlying PDF writer error
        reason: String,
    },
}

/// API error response format
///
/// This structure is returned by API endpoints when an error occurs.
/// It follows a standard format with machine-readable error codes,
/// human-readable messages, and optional contextual details.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "not_found",
///     "message": "job 123 not found",
///     "details": {
///       "job_id": 123
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "not_found", "validation_error")
    ///
    /// Clients can use this for programmatic error handling.
    pub code: String,

    /// Human-readable error message
    ///
    /// This is suitable for displaying to end users.
    pub message: String,

    /// Optional additional context about the error
    ///
    /// This can include fields like job_id, current status, validation field, etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    /// Create a "not found" error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new("not_found", format!("{} not found", resource.into()))
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
///
/// This trait maps domain errors to appropriate HTTP status codes.
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::Validation { .. } => 400,

            // 404 Not Found
            Error::NotFound(_) => 404,

            // 409 Conflict - Resource not in the required state
            Error::NotReady { .. } => 409,

            // 502 Bad Gateway - Remote host errors
            Error::Manifest(_) => 502,
            Error::Page(_) => 502,
            Error::Network(_) => 502,
            Error::NoPagesRecovered { .. } => 502,

            // 503 Service Unavailable
            Error::ShuttingDown => 503,

            // 500 Internal Server Error - Server-side issues
            Error::Assembly(_) => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Validation { .. } => "validation_error",
            Error::Manifest(e) => match e {
                ManifestError::Fetch { .. } => "manifest_fetch_failed",
                ManifestError::Status { .. } => "manifest_fetch_failed",
                ManifestError::Format { .. } => "manifest_malformed",
            },
            Error::Page(e) => match e {
                PageError::Unresolved { .. } => "page_unresolved",
                PageError::Status { .. } => "page_transport_failed",
                PageError::Transport { .. } => "page_transport_failed",
            },
            Error::NoPagesRecovered { .. } => "no_pages_recovered",
            Error::Assembly(e) => match e {
                AssemblyError::ImageDecode { .. } => "image_decode_failed",
                AssemblyError::Encode { .. } => "image_encode_failed",
                AssemblyError::EmptyDocument => "empty_document",
                AssemblyError::Pdf { .. } => "pdf_write_failed",
            },
            Error::NotFound(_) => "not_found",
            Error::NotReady { .. } => "not_ready",
            Error::ShuttingDown => "shutting_down",
            Error::Network(_) => "network_error",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        // Add contextual details for specific error types
        let details = match &error {
            Error::Validation { field: Some(f), .. } => Some(serde_json::json!({
                "field": f,
            })),
            Error::NotReady { id, status } => Some(serde_json::json!({
                "job_id": id,
                "status": status,
            })),
            Error::NoPagesRecovered { id } => Some(serde_json::json!({
                "job_id": id,
            })),
            Error::Manifest(ManifestError::Status { source_id, status }) => {
                Some(serde_json::json!({
                    "source_id": source_id,
                    "upstream_status": status,
                }))
            }
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
