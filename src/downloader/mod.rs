//! Core downloader implementation split into focused submodules.
//!
//! The `FlipbookDownloader` struct and its methods are organized by domain:
//! - [`control`] - Job lifecycle control (start/pause/resume/cancel/result)
//! - [`job_task`] - The background pipeline run for each job

mod control;
mod job_task;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use crate::config::Config;
use crate::error::Result;
use crate::registry::JobRegistry;
use crate::types::Event;

/// Main downloader instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct FlipbookDownloader {
    /// In-memory job registry, the single source of truth for job state
    pub(crate) registry: std::sync::Arc<JobRegistry>,
    /// Shared HTTP client (connection pooling across manifest, probe and page requests)
    pub(crate) client: reqwest::Client,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: std::sync::Arc<Config>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Cancelled on shutdown; every job task races its pipeline against this
    pub(crate) shutdown_token: tokio_util::sync::CancellationToken,
    /// Flag to indicate whether new jobs are accepted (set to false during shutdown)
    pub(crate) accepting_new: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

impl FlipbookDownloader {
    /// Create a new FlipbookDownloader instance
    ///
    /// This validates the configuration, builds the shared HTTP client and
    /// sets up the event broadcast channel. No background work starts until
    /// [`start`](Self::start) is called.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(
                config.source.request_timeout_secs,
            ))
            .user_agent(config.source.user_agent.clone())
            .build()?;

        // Buffer size of 1000 events; slow subscribers lag rather than block
        let (event_tx, _rx) = tokio::sync::broadcast::channel(1000);

        Ok(Self {
            registry: std::sync::Arc::new(JobRegistry::new()),
            client,
            config: std::sync::Arc::new(config),
            event_tx,
            shutdown_token: tokio_util::sync::CancellationToken::new(),
            accepting_new: std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true)),
        })
    }

    /// Subscribe to the event stream
    ///
    /// Returns a broadcast receiver delivering every [`Event`] emitted after
    /// the point of subscription. Multiple subscribers each get all events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub(crate) fn emit_event(&self, event: Event) {
        // send() returns Err if there are no receivers, which is fine - we just drop the event
        self.event_tx.send(event).ok();
    }

    /// Gracefully shut down the downloader
    ///
    /// Stops accepting new jobs, signals every running job task to stop at
    /// its next boundary and emits [`Event::Shutdown`]. Job records stay in
    /// the registry so finished results remain fetchable by the caller.
    pub fn shutdown(&self) {
        tracing::info!("Initiating graceful shutdown");
        self.accepting_new
            .store(false, std::sync::atomic::Ordering::SeqCst);
        self.emit_event(Event::Shutdown);
        self.shutdown_token.cancel();
        tracing::info!("Shutdown signaled to all job tasks");
    }

    /// Spawn the REST API server in a background task
    ///
    /// The server runs concurrently with job processing and listens on the
    /// configured bind address (default: 127.0.0.1:7474).
    pub fn spawn_api_server(&self) -> tokio::task::JoinHandle<Result<()>> {
        let downloader = std::sync::Arc::new(self.clone());
        let config = self.config.clone();

        tokio::spawn(async move { crate::api::start_api_server(downloader, config).await })
    }
}
