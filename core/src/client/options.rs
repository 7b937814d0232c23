//! Per-call overrides and cancellation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// Overrides applied to a single invocation.
///
/// Unset fields fall back to the client's [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Deadline spanning every attempt and backoff sleep of the call.
    pub timeout: Option<Duration>,
    /// Total attempt budget for this call.
    pub max_attempts: Option<u32>,
    /// Signal that aborts the call when fired.
    pub cancel: Option<CancelSignal>,
}

impl CallOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// A cloneable cancellation flag.
///
/// Every clone observes the same flag; once [`cancel`](Self::cancel) is
/// called it stays cancelled.
///
/// ## Examples
///
/// ```rust
/// use mlsdk_core::CancelSignal;
///
/// let signal = CancelSignal::new();
/// let observer = signal.clone();
/// signal.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancelSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Fires the signal.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the signal has fired.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}
