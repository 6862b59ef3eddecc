// Domain Layer - Task representation and pool configuration

pub mod config;
pub mod error;
pub mod task;

// Re-exports
pub use config::{PoolConfig, DEFAULT_QUEUE_CAPACITY, FALLBACK_WORKER_COUNT};
pub use error::DomainError;
pub use task::{CipherAction, FileTask, TaskToken};
