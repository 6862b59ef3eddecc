// Serialized reporting channel

use crate::port::{CompletionReport, ReportSink};
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// Owns the report sink behind its own lock
///
/// The lock is held for exactly one `emit`, never while a task runs or
/// while the queue lock is held, so reports from different workers never
/// interleave and never stall the queue.
pub struct Reporter {
    sink: Mutex<Box<dyn ReportSink>>,
}

impl Reporter {
    pub fn new(sink: Box<dyn ReportSink>) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    /// Emit one report; sink errors are logged and swallowed
    pub fn report(&self, report: &CompletionReport) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = sink.emit(report) {
            warn!(error = %e, token = %report.token, "Failed to emit completion report");
        }
    }
}
