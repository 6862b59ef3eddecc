// Workpool Infrastructure - System Adapters
// Implements: SystemProbe, TaskExecutor

pub mod cipher_executor;
pub mod subprocess_executor;
pub mod system_probe_impl;

pub use cipher_executor::CipherExecutor;
pub use subprocess_executor::SubprocessExecutor;
pub use system_probe_impl::SystemProbeImpl;
