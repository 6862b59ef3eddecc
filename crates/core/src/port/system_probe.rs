// System Probe Port
// Platform hint used to size the worker pool

/// System probe port
pub trait SystemProbe: Send + Sync {
    /// Number of CPU cores the platform reports, `None` if unknown
    fn available_cores(&self) -> Option<usize>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;

    /// Probe that always answers with a fixed core count
    pub struct FixedSystemProbe {
        cores: Option<usize>,
    }

    impl FixedSystemProbe {
        pub fn new(cores: Option<usize>) -> Self {
            Self { cores }
        }
    }

    impl SystemProbe for FixedSystemProbe {
        fn available_cores(&self) -> Option<usize> {
            self.cores
        }
    }
}
