//! In-memory job registry
//!
//! Single source of truth for job state. All mutation goes through this type;
//! the lock is a plain [`std::sync::Mutex`] and is never held across an await
//! point, so every method is a short critical section.
//!
//! Orchestrator-side mutators return `bool` rather than an error: `false`
//! means the job record is gone (cancelled), which the running task treats as
//! a signal to abandon work at the next boundary.

use crate::error::{Error, Result};
use crate::pause::PauseGate;
use crate::types::{JobId, JobView, Status};
use crate::utils::{DEFAULT_TITLE, sanitize_title};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

/// A single tracked job
struct Job {
    id: JobId,
    source_id: String,
    status: Status,
    title: String,
    total_pages: u32,
    completed_pages: u32,
    skipped_pages: u32,
    paused: bool,
    pause_gate: PauseGate,
    result: Option<Vec<u8>>,
    created_at: DateTime<Utc>,
}

impl Job {
    fn view(&self) -> JobView {
        JobView {
            id: self.id,
            source_id: self.source_id.clone(),
            status: self.status,
            title: self.title.clone(),
            total_pages: self.total_pages,
            completed_pages: self.completed_pages,
            skipped_pages: self.skipped_pages,
            paused: self.paused,
            created_at: self.created_at,
        }
    }
}

/// Registry of all jobs known to the process
pub struct JobRegistry {
    jobs: Mutex<HashMap<JobId, Job>>,
    next_id: AtomicI64,
}

impl JobRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<JobId, Job>> {
        // A poisoned lock means a panic inside a critical section; the state
        // is plain data, so continuing with it is safe.
        match self.jobs.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Register a new job in [`Status::Starting`] and return its id together
    /// with the pause gate its fetchers will wait on.
    pub fn create(&self, source_id: &str) -> (JobId, PauseGate) {
        let id = JobId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let gate = PauseGate::new();
        let job = Job {
            id,
            source_id: source_id.to_string(),
            status: Status::Starting,
            title: DEFAULT_TITLE.to_string(),
            total_pages: 0,
            completed_pages: 0,
            skipped_pages: 0,
            paused: false,
            pause_gate: gate.clone(),
            result: None,
            created_at: Utc::now(),
        };
        self.lock().insert(id, job);
        (id, gate)
    }

    /// Snapshot of a job's externally visible state
    pub fn snapshot(&self, id: JobId) -> Option<JobView> {
        self.lock().get(&id).map(Job::view)
    }

    /// Number of jobs currently tracked
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the registry tracks no jobs
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Ids of all tracked jobs, unordered
    pub fn job_ids(&self) -> Vec<JobId> {
        self.lock().keys().copied().collect()
    }

    /// Snapshots of all tracked jobs, newest first
    pub fn snapshots(&self) -> Vec<JobView> {
        let mut views: Vec<JobView> = self.lock().values().map(Job::view).collect();
        views.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.get().cmp(&a.id.get())));
        views
    }

    /// Flip the pause flag and its gate, returning the updated view.
    ///
    /// Pausing an already paused job (or resuming a running one) is a no-op
    /// that still returns the current view.
    pub fn set_paused(&self, id: JobId, paused: bool) -> Option<JobView> {
        let mut jobs = self.lock();
        let job = jobs.get_mut(&id)?;
        job.paused = paused;
        if paused {
            job.pause_gate.pause();
        } else {
            job.pause_gate.resume();
        }
        Some(job.view())
    }

    /// Fetch the assembled document for a finished job.
    ///
    /// Returns the document bytes and the job title (used for the download
    /// filename). Errors with `NotReady` while the job is still in flight or
    /// has failed.
    pub fn result(&self, id: JobId) -> Result<(Vec<u8>, String)> {
        let jobs = self.lock();
        let job = jobs
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("Job {id} not found")))?;
        match (&job.result, job.status) {
            (Some(bytes), Status::Done) => Ok((bytes.clone(), job.title.clone())),
            _ => Err(Error::NotReady {
                id,
                status: job.status,
            }),
        }
    }

    /// Drop a job record. Returns `false` if the id was unknown.
    ///
    /// A running task for the job keeps going until its next registry
    /// interaction, at which point the missing record makes it abandon. The
    /// pause gate is reopened on removal so fetchers parked on a paused job
    /// drain immediately instead of waiting for a resume that cannot come.
    pub fn remove(&self, id: JobId) -> bool {
        match self.lock().remove(&id) {
            Some(job) => {
                job.pause_gate.resume();
                true
            }
            None => false,
        }
    }

    // --- orchestrator mutators ---

    /// Move a job to a new status. `false` when the record is gone.
    pub fn update_status(&self, id: JobId, status: Status) -> bool {
        let mut jobs = self.lock();
        let Some(job) = jobs.get_mut(&id) else {
            return false;
        };
        job.status = status;
        true
    }

    /// Record the manifest-derived title and page count.
    ///
    /// The raw title is sanitized for filesystem use; an empty or
    /// whitespace-only title falls back to the placeholder.
    pub fn set_manifest(&self, id: JobId, raw_title: &str, total_pages: u32) -> bool {
        let title = sanitize_title(raw_title);
        let mut jobs = self.lock();
        let Some(job) = jobs.get_mut(&id) else {
            return false;
        };
        job.title = title;
        job.total_pages = total_pages;
        true
    }

    /// Bump the completed-page counter. `false` when the record is gone.
    pub fn increment_completed(&self, id: JobId) -> bool {
        let mut jobs = self.lock();
        let Some(job) = jobs.get_mut(&id) else {
            return false;
        };
        job.completed_pages += 1;
        true
    }

    /// Bump the skipped-page counter. `false` when the record is gone.
    pub fn increment_skipped(&self, id: JobId) -> bool {
        let mut jobs = self.lock();
        let Some(job) = jobs.get_mut(&id) else {
            return false;
        };
        job.skipped_pages += 1;
        true
    }

    /// Store the assembled document and mark the job done in one step, so no
    /// observer can see `Done` without a result being available.
    pub fn store_result(&self, id: JobId, bytes: Vec<u8>) -> bool {
        let mut jobs = self.lock();
        let Some(job) = jobs.get_mut(&id) else {
            return false;
        };
        job.result = Some(bytes);
        job.status = Status::Done;
        true
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}
