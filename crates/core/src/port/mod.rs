// Port Layer - Interfaces for external collaborators

pub mod report_sink;
pub mod system_probe;
pub mod task_executor;
pub mod time_provider; // For deterministic testing

// Re-exports
pub use report_sink::{
    CompletionReport, JsonReportSink, LogReportSink, ReportSink, TaskOutcome, TextReportSink,
};
pub use system_probe::SystemProbe;
pub use task_executor::{ExecutionError, TaskExecutor};
pub use time_provider::TimeProvider;
