//! Cancellation of in-flight confirmation waits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

/// Cancels every confirmation wait subscribed to it.
///
/// Once triggered it stays triggered: a wait that subscribes afterwards is
/// cancelled on its first `recv`.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Receiver for `ConfirmationTracker::await_confirmation_until`.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        let rx = self.tx.subscribe();
        if self.is_triggered() {
            // Re-arm for the late subscriber; earlier ones already stopped waiting.
            let _ = self.tx.send(());
        }
        rx
    }

    /// Cancel all waits. Returns how many were subscribed.
    pub fn trigger(&self) -> usize {
        self.triggered.store(true, Ordering::SeqCst);
        self.tx.send(()).unwrap_or(0)
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Waits currently subscribed.
    pub fn pending_waits(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
