// Pool Configuration

use crate::error::{PoolError, Result};
use crate::port::SystemProbe;

/// Default number of queued tokens before producers block
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Worker count used when the platform reports no core count
pub const FALLBACK_WORKER_COUNT: usize = 2;

/// Pool configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Explicit worker count; `None` means "ask the platform"
    pub workers: Option<usize>,
    pub queue_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl PoolConfig {
    pub fn new(workers: Option<usize>, queue_capacity: usize) -> Self {
        Self {
            workers,
            queue_capacity,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    /// Reject values the pool cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(PoolError::Config(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        if self.workers == Some(0) {
            return Err(PoolError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the number of workers to launch
    ///
    /// Explicit configuration wins; otherwise the probed core count is used,
    /// falling back to [`FALLBACK_WORKER_COUNT`] when the probe has no answer
    /// or answers 0.
    pub fn worker_count(&self, probe: &dyn SystemProbe) -> usize {
        match self.workers {
            Some(n) => n,
            None => match probe.available_cores() {
                Some(n) if n > 0 => n,
                _ => FALLBACK_WORKER_COUNT,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::system_probe::mocks::FixedSystemProbe;

    #[test]
    fn test_default_config() {
        let config = PoolConfig::default();
        assert_eq!(config.workers, None);
        assert_eq!(config.queue_capacity, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_is_config_error() {
        let config = PoolConfig::default().with_queue_capacity(0);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, PoolError::Config(_)));
        assert!(err.to_string().contains("queue capacity"));
    }

    #[test]
    fn test_zero_workers_is_config_error() {
        let config = PoolConfig::default().with_workers(0);
        assert!(matches!(config.validate(), Err(PoolError::Config(_))));
    }

    #[test]
    fn test_worker_count_resolution() {
        let eight = FixedSystemProbe::new(Some(8));
        let zero = FixedSystemProbe::new(Some(0));
        let unknown = FixedSystemProbe::new(None);

        assert_eq!(PoolConfig::default().worker_count(&eight), 8);
        assert_eq!(PoolConfig::default().worker_count(&zero), FALLBACK_WORKER_COUNT);
        assert_eq!(PoolConfig::default().worker_count(&unknown), FALLBACK_WORKER_COUNT);
        assert_eq!(PoolConfig::default().with_workers(3).worker_count(&eight), 3);
    }
}
