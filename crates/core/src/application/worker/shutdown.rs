// Stop Signal

use std::sync::atomic::{AtomicBool, Ordering};

/// Monotonic stop flag: false -> true, never back
///
/// Readable from any thread without a lock. The queue only calls
/// [`StopSignal::trigger`] while holding its own lock, so the flag never
/// changes between a waiter's predicate check and its wait.
#[derive(Debug, Default)]
pub struct StopSignal {
    stopped: AtomicBool,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if stop was requested
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Raise the flag; returns true only for the call that raised it
    pub fn trigger(&self) -> bool {
        !self.stopped.swap(true, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_is_one_shot() {
        let signal = StopSignal::new();
        assert!(!signal.is_stopped());
        assert!(signal.trigger());
        assert!(signal.is_stopped());
        assert!(!signal.trigger());
        assert!(signal.is_stopped());
    }
}
