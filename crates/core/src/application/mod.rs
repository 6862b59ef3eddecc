// Application Layer - Queue hand-off and worker lifecycle

pub mod queue;
pub mod worker;

// Re-exports
pub use queue::BoundedTaskQueue;
pub use worker::{ShutdownSummary, StopSignal, WorkerPool};
