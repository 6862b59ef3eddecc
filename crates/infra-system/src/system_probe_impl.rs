// System probe implementation
// reason: sysinfo for cross-platform CPU enumeration
use std::sync::{Mutex, PoisonError};
use sysinfo::System;
use tracing::debug;

use workpool_core::port::SystemProbe;

/// System probe implementation using sysinfo
pub struct SystemProbeImpl {
    system: Mutex<System>,
}

impl SystemProbeImpl {
    /// Create a new system probe
    ///
    /// # Example
    /// ```ignore
    /// let probe = SystemProbeImpl::new();
    /// let workers = config.worker_count(&probe);
    /// ```
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SystemProbeImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProbe for SystemProbeImpl {
    fn available_cores(&self) -> Option<usize> {
        let mut sys = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        sys.refresh_cpu();

        let cores = sys.cpus().len();
        debug!(cores, "CPU cores detected");

        (cores > 0).then_some(cores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_cores_is_positive_when_known() {
        let probe = SystemProbeImpl::new();
        if let Some(cores) = probe.available_cores() {
            assert!(cores > 0);
        }
    }

    #[test]
    fn test_repeated_probing_is_stable() {
        let probe = SystemProbeImpl::default();
        assert_eq!(probe.available_cores(), probe.available_cores());
    }
}
