// Report Sink Port
// Where per-task completion records go

use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;
use tracing::{info, warn};

/// How a task ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskOutcome {
    Succeeded,
    /// Executor returned an error
    Failed(String),
    /// Executor panicked; the worker caught it
    Panicked(String),
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Succeeded)
    }
}

/// One record per executed task
#[derive(Debug, Clone, Serialize)]
pub struct CompletionReport {
    pub worker_id: usize,
    pub token: String,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    #[serde(flatten)]
    pub outcome: TaskOutcome,
    pub finished_at_ms: i64,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Report sink trait
///
/// Takes `&mut self`: the pool serializes all emissions behind one lock,
/// so implementations need no locking of their own.
pub trait ReportSink: Send {
    fn emit(&mut self, report: &CompletionReport) -> io::Result<()>;
}

/// Human-readable line per task:
/// `Task (<token>) finished in <secs> seconds`
pub struct TextReportSink<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TextReportSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ReportSink for TextReportSink<W> {
    fn emit(&mut self, report: &CompletionReport) -> io::Result<()> {
        let secs = report.elapsed.as_secs_f64();
        match &report.outcome {
            TaskOutcome::Succeeded => {
                writeln!(self.out, "Task ({}) finished in {} seconds", report.token, secs)?
            }
            TaskOutcome::Failed(reason) => writeln!(
                self.out,
                "Task ({}) failed in {} seconds: {}",
                report.token, secs, reason
            )?,
            TaskOutcome::Panicked(reason) => writeln!(
                self.out,
                "Task ({}) panicked in {} seconds: {}",
                report.token, secs, reason
            )?,
        }
        self.out.flush()
    }
}

/// One JSON object per line
pub struct JsonReportSink<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonReportSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ReportSink for JsonReportSink<W> {
    fn emit(&mut self, report: &CompletionReport) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, report)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

/// Sends reports to the tracing subscriber instead of stdout
pub struct LogReportSink;

impl ReportSink for LogReportSink {
    fn emit(&mut self, report: &CompletionReport) -> io::Result<()> {
        let elapsed_ms = report.elapsed.as_millis() as u64;
        match &report.outcome {
            TaskOutcome::Succeeded => info!(
                worker_id = report.worker_id,
                token = %report.token,
                elapsed_ms,
                "Task finished"
            ),
            TaskOutcome::Failed(reason) | TaskOutcome::Panicked(reason) => warn!(
                worker_id = report.worker_id,
                token = %report.token,
                elapsed_ms,
                reason = %reason,
                "Task failed"
            ),
        }
        Ok(())
    }
}
