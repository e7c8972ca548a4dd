//! Cancellation scopes for in-flight dispatches.

use std::sync::Arc;

use tokio::sync::watch;

/// Clonable handle cancelling every asynchronous hop that observes it.
///
/// A scope stays cancelled once [`cancel`] has been called; observers that
/// look late still see it. Each dispatch is associated with one scope, and
/// after cancellation nothing is delivered to the caller even if the
/// underlying work completes internally.
///
/// [`cancel`]: CancellationScope::cancel
#[derive(Debug, Clone)]
pub struct CancellationScope {
    sender: Arc<watch::Sender<bool>>,
}

impl CancellationScope {
    /// Create a scope that has not been cancelled.
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Cancel the scope. Idempotent.
    pub fn cancel(&self) {
        // `send` drops the update when no receiver is alive; `send_replace`
        // records it even while nobody is waiting yet.
        self.sender.send_replace(true);
    }

    /// Whether the scope has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Wait until the scope is cancelled.
    ///
    /// Returns immediately when the scope was cancelled before the call.
    pub async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives inside `self`, so the channel cannot close while
        // we wait on it.
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancellationScope {
    fn default() -> Self {
        Self::new()
    }
}
