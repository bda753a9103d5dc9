//! Cooperative cancellation flag.
//!
//! A `ShutdownSignal` is created once per process, handed to the OS signal
//! handler and to the sequencer, and never reset. Every poll loop reads it
//! without blocking; the handler sets it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide shutdown request flag. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Create a flag in the "not requested" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown. Safe to call from a signal handler thread; idempotent.
    pub fn request_shutdown(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Non-blocking read of the flag.
    pub fn is_shutdown_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initially_not_requested() {
        assert!(!ShutdownSignal::new().is_shutdown_requested());
    }

    #[test]
    fn test_request_is_idempotent() {
        let signal = ShutdownSignal::new();
        signal.request_shutdown();
        assert!(signal.is_shutdown_requested());
        signal.request_shutdown();
        assert!(signal.is_shutdown_requested());
    }

    #[test]
    fn test_clones_share_flag() {
        let signal = ShutdownSignal::new();
        let handler_side = signal.clone();

        std::thread::spawn(move || handler_side.request_shutdown())
            .join()
            .unwrap();

        assert!(signal.is_shutdown_requested());
    }
}
