//! Pause gate shared between a job's in-flight page fetchers
//!
//! The gate is a two-state (open/closed) synchronization primitive. Any number
//! of fetchers may wait on it concurrently; a single control surface flips it.
//! Fetchers consult the gate before every chunk read, so a pause takes effect
//! within one chunk's latency rather than only between pages.

use std::sync::Arc;
use tokio::sync::watch;

/// Resettable open/closed gate. Created open.
///
/// Cloning is cheap and all clones observe the same gate. The gate is safe for
/// many concurrent waiters and one flipper without external locking.
#[derive(Clone, Debug)]
pub struct PauseGate {
    tx: Arc<watch::Sender<bool>>,
}

impl PauseGate {
    /// Create a new gate in the open state
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(true);
        Self { tx: Arc::new(tx) }
    }

    /// Close the gate. Waiters in [`PauseGate::opened`] block until reopened.
    pub fn pause(&self) {
        self.tx.send_replace(false);
    }

    /// Reopen the gate, releasing all current waiters.
    pub fn resume(&self) {
        self.tx.send_replace(true);
    }

    /// Whether the gate is currently closed
    pub fn is_paused(&self) -> bool {
        !*self.tx.borrow()
    }

    /// Wait until the gate is open. Returns immediately if it already is.
    pub async fn opened(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives inside self, so wait_for cannot observe a closed
        // channel while we hold &self.
        let _ = rx.wait_for(|open| *open).await;
    }
}

impl Default for PauseGate {
    fn default() -> Self {
        Self::new()
    }
}
