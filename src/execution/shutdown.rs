//! Cooperative run cancellation.
//!
//! Cancellation is a quiet early-stop, never forced termination: the scheduler
//! stops launching new partitions, workers stop claiming new groups, and any
//! resource that was initialized is still disposed. Results already obtained
//! remain part of the final summary.

use tokio::sync::watch;

/// Sending half of the shutdown channel, held by the run host.
#[derive(Debug)]
pub struct ShutdownController {
    tx: watch::Sender<bool>,
}

/// Receiving half, cloned into every worker and collaborator.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownController {
    /// Create a controller/signal pair for one run.
    pub fn new() -> (Self, ShutdownSignal) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, ShutdownSignal { rx })
    }

    /// Request a cooperative stop. Idempotent.
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

impl ShutdownSignal {
    /// Whether a stop has been requested.
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Suspend until a stop is requested. Returns immediately if the
    /// controller was dropped without triggering.
    pub async fn triggered(&mut self) {
        let _ = self.rx.wait_for(|triggered| *triggered).await;
    }
}
