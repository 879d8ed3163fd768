//! Cooperative cancellation for long-running searches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cancellation flag, polled by the engine once per iteration.
///
/// Cancellation is cooperative, not preemptive: an in-flight shift/validate
/// call completes and its outcome is recorded, only the next iteration is
/// skipped. Typically one clone goes to the engine and another to whatever
/// handles operator interrupt requests.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent; there is no way to un-cancel.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
