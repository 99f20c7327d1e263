//! Core types for flipbook-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unique identifier for a job
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct JobId(pub i64);

impl JobId {
    /// Create a new JobId
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for JobId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<JobId> for i64 {
    fn from(id: JobId) -> Self {
        id.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for JobId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Job status
///
/// The happy path walks `Starting → Downloading → Compressing →
/// CreatingDocument → Done`. `Failed` is terminal and reachable from any
/// non-terminal state. Cancellation is modeled as removal from the registry,
/// not as a status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Job record created, manifest not yet loaded
    Starting,
    /// Pages are being resolved and fetched
    Downloading,
    /// Downloaded pages are being normalized
    Compressing,
    /// Normalized pages are being assembled into the output document
    CreatingDocument,
    /// Document ready; the result bytes are available
    Done,
    /// Terminal failure; a fresh job must be started
    Failed,
}

impl Status {
    /// Whether this status is terminal (no further transitions occur)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Done | Status::Failed)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Starting => "starting",
            Status::Downloading => "downloading",
            Status::Compressing => "compressing",
            Status::CreatingDocument => "creating_document",
            Status::Done => "done",
            Status::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// One entry of a book's manifest: a page's position and name token.
///
/// Immutable once read from the manifest. `index` is zero-based and defines
/// the final document order; `name` is the source-specific token used to build
/// candidate URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageDescriptor {
    /// Zero-based position in the final document
    pub index: u32,
    /// Opaque source-specific name token
    pub name: String,
}

/// Read-only snapshot of a job's observable state
///
/// Excludes the pause gate (an internal synchronization handle) and the
/// result bytes (potentially large; fetched via the result endpoint).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JobView {
    /// Job identifier
    pub id: JobId,
    /// Caller-supplied book identifier
    pub source_id: String,
    /// Current pipeline status
    pub status: Status,
    /// Sanitized display title (placeholder until the manifest loads)
    pub title: String,
    /// Total pages per the manifest (0 until the manifest loads)
    pub total_pages: u32,
    /// Pages fetched so far
    pub completed_pages: u32,
    /// Pages dropped because no URL resolved or the transfer failed
    pub skipped_pages: u32,
    /// Whether the pause gate is currently closed
    pub paused: bool,
    /// When the job record was created
    pub created_at: DateTime<Utc>,
}

/// Event emitted during job lifecycle
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Job record created and orchestrator spawned
    JobQueued {
        /// Job ID
        id: JobId,
        /// Caller-supplied book identifier
        source_id: String,
    },

    /// Job moved to a new pipeline status
    StatusChanged {
        /// Job ID
        id: JobId,
        /// The new status
        status: Status,
    },

    /// Manifest loaded; page count and title are now known
    ManifestLoaded {
        /// Job ID
        id: JobId,
        /// Number of page descriptors in the manifest
        total_pages: u32,
        /// Sanitized title
        title: String,
    },

    /// One page finished downloading
    PageCompleted {
        /// Job ID
        id: JobId,
        /// Pages fetched so far
        completed_pages: u32,
        /// Total pages per the manifest
        total_pages: u32,
    },

    /// One page was dropped (unresolvable or transport failure)
    PageSkipped {
        /// Job ID
        id: JobId,
        /// Zero-based index of the dropped page
        index: u32,
    },

    /// Job finished; the result document is available
    JobComplete {
        /// Job ID
        id: JobId,
        /// Number of pages in the final document
        pages: u32,
    },

    /// Job failed terminally
    JobFailed {
        /// Job ID
        id: JobId,
        /// Error message
        error: String,
    },

    /// Job record removed by cancellation
    JobRemoved {
        /// Job ID
        id: JobId,
    },

    /// Pause gate closed
    JobPaused {
        /// Job ID
        id: JobId,
    },

    /// Pause gate reopened
    JobResumed {
        /// Job ID
        id: JobId,
    },

    /// Process-wide shutdown initiated
    Shutdown,
}
