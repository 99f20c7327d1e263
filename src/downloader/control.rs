//! Job lifecycle control — start, pause, resume, cancel, result retrieval.

use crate::error::{Error, Result};
use crate::types::{Event, JobId, JobView};
use crate::utils::validate_source_id;

use super::FlipbookDownloader;

impl FlipbookDownloader {
    /// Start a new download job for a source document
    ///
    /// Validates the source id, registers the job in `Starting` state and
    /// spawns the background pipeline. Returns the job id immediately; all
    /// progress is observable via [`progress`](Self::progress) and the event
    /// stream.
    ///
    /// # Errors
    ///
    /// - `Validation` if the source id is empty or not alphanumeric
    /// - `ShuttingDown` if shutdown has begun
    pub fn start(&self, source_id: &str) -> Result<JobId> {
        if !self.accepting_new.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(Error::ShuttingDown);
        }
        validate_source_id(source_id)?;

        let (id, gate) = self.registry.create(source_id);
        tracing::info!(job_id = id.get(), source_id, "Job queued");
        self.emit_event(Event::JobQueued {
            id,
            source_id: source_id.to_string(),
        });

        let downloader = self.clone();
        let source = source_id.to_string();
        tokio::spawn(async move {
            job_task_entry(downloader, id, source, gate).await;
        });

        Ok(id)
    }

    /// Snapshot of a job's current state
    pub fn progress(&self, id: JobId) -> Result<JobView> {
        self.registry
            .snapshot(id)
            .ok_or_else(|| Error::NotFound(format!("Job {id} not found")))
    }

    /// Snapshots of all known jobs, newest first
    pub fn all_jobs(&self) -> Vec<JobView> {
        self.registry.snapshots()
    }

    /// Pause or resume a job
    ///
    /// Pausing closes the job's pause gate; in-flight page transfers stall
    /// before their next chunk and resume exactly where they left off. The
    /// operation is a no-op (but still succeeds) when the job is already in
    /// the requested state.
    pub fn set_paused(&self, id: JobId, paused: bool) -> Result<JobView> {
        let view = self
            .registry
            .set_paused(id, paused)
            .ok_or_else(|| Error::NotFound(format!("Job {id} not found")))?;
        if paused {
            tracing::info!(job_id = id.get(), "Job paused");
            self.emit_event(Event::JobPaused { id });
        } else {
            tracing::info!(job_id = id.get(), "Job resumed");
            self.emit_event(Event::JobResumed { id });
        }
        Ok(view)
    }

    /// Fetch the assembled document of a finished job
    ///
    /// Returns the document bytes and the sanitized title to name the file
    /// after. Errors with `NotReady` while the job is still in flight.
    pub fn fetch_result(&self, id: JobId) -> Result<(Vec<u8>, String)> {
        self.registry.result(id)
    }

    /// Cancel a job and drop its record
    ///
    /// The running task notices the missing record at its next registry
    /// interaction and abandons without producing a result. Cancelling a
    /// finished job simply discards the stored document.
    pub fn cancel(&self, id: JobId) -> Result<()> {
        if !self.registry.remove(id) {
            return Err(Error::NotFound(format!("Job {id} not found")));
        }
        tracing::info!(job_id = id.get(), "Job cancelled");
        self.emit_event(Event::JobRemoved { id });
        Ok(())
    }
}

/// Run the job pipeline, translating its outcome into registry state and events.
async fn job_task_entry(
    downloader: FlipbookDownloader,
    id: JobId,
    source_id: String,
    gate: crate::pause::PauseGate,
) {
    let shutdown = downloader.shutdown_token.clone();
    tokio::select! {
        outcome = super::job_task::run(&downloader, id, &source_id, gate) => {
            match outcome {
                Ok(pages) => {
                    tracing::info!(job_id = id.get(), pages, "Job complete");
                    downloader.emit_event(Event::JobComplete {
                        id,
                        pages: pages as u32,
                    });
                }
                Err(e) => {
                    // A cancelled job has no record left; only surviving jobs fail
                    if downloader.registry.update_status(id, crate::types::Status::Failed) {
                        tracing::error!(job_id = id.get(), error = %e, "Job failed");
                        downloader.emit_event(Event::JobFailed {
                            id,
                            error: e.to_string(),
                        });
                    } else {
                        tracing::debug!(job_id = id.get(), "Job abandoned after cancellation");
                    }
                }
            }
        }
        _ = shutdown.cancelled() => {
            if downloader.registry.update_status(id, crate::types::Status::Failed) {
                tracing::info!(job_id = id.get(), "Job stopped by shutdown");
                downloader.emit_event(Event::JobFailed {
                    id,
                    error: "shutdown".to_string(),
                });
            }
        }
    }
}
