// Workpool Core - Bounded queue, worker pool & ports
// NO infrastructure dependencies: adapters live in workpool-infra-system

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{BoundedTaskQueue, ShutdownSummary, WorkerPool};
pub use domain::{PoolConfig, TaskToken};
pub use error::{PoolError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
