//! Configuration types for flipbook-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use utoipa::ToSchema;

/// Remote host configuration (base URL, timeouts, fan-out bound)
///
/// Groups settings related to how manifests and pages are fetched from the
/// flipbook host. Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SourceConfig {
    /// Base URL of the flipbook host (default: "https://online.fliphtml5.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User-Agent header sent on outbound requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum concurrent page fetches per job (default: 8)
    ///
    /// Bounds the fan-out worker pool. Observable semantics are unchanged by
    /// this bound; it only limits pressure on the remote host.
    #[serde(default = "default_max_concurrent_pages")]
    pub max_concurrent_pages: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
            max_concurrent_pages: default_max_concurrent_pages(),
        }
    }
}

/// Image normalization parameters
///
/// Fixed per-process constants, not per-call inputs; normalization is
/// deterministic for a given input under a fixed config.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ProcessingConfig {
    /// Factor applied to both page dimensions (default: 0.6, must be in (0, 1])
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f32,

    /// JPEG re-encode quality, 1-100 (default: 30)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            scale_factor: default_scale_factor(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

/// REST API server configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Bind address for the API server (default: 127.0.0.1:7474)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Whether to add a CORS layer (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins; "*" or empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Whether to serve the interactive Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: Vec::new(),
            swagger_ui: true,
        }
    }
}

/// Server configuration (nested to leave room for non-API surfaces)
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerConfig {
    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,
}

/// Top-level configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Remote host settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Image normalization settings
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Validate the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.source.base_url.is_empty() {
            return Err(Error::Validation {
                message: "source.base_url must not be empty".to_string(),
                field: Some("source.base_url".to_string()),
            });
        }

        if self.source.max_concurrent_pages == 0 {
            return Err(Error::Validation {
                message: "source.max_concurrent_pages must be at least 1".to_string(),
                field: Some("source.max_concurrent_pages".to_string()),
            });
        }

        if !(self.processing.scale_factor > 0.0 && self.processing.scale_factor <= 1.0) {
            return Err(Error::Validation {
                message: "processing.scale_factor must be in (0, 1]".to_string(),
                field: Some("processing.scale_factor".to_string()),
            });
        }

        if self.processing.jpeg_quality == 0 || self.processing.jpeg_quality > 100 {
            return Err(Error::Validation {
                message: "processing.jpeg_quality must be between 1 and 100".to_string(),
                field: Some("processing.jpeg_quality".to_string()),
            });
        }

        Ok(())
    }
}

fn default_base_url() -> String {
    "https://online.fliphtml5.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_max_concurrent_pages() -> usize {
    8
}

fn default_scale_factor() -> f32 {
    0.6
}

fn default_jpeg_quality() -> u8 {
    30
}

fn default_bind_address() -> SocketAddr {
    #[allow(clippy::expect_used)]
    "127.0.0.1:7474"
        .parse()
        .expect("default bind address is valid")
}

fn default_true() -> bool {
    true
}
