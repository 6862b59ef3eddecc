//! Command-line surface
//! Every option can also come from a `WORKPOOL_*` environment variable.

use clap::{Parser, ValueEnum};
use std::io;
use std::sync::Arc;

use workpool_core::domain::{CipherAction, PoolConfig, DEFAULT_QUEUE_CAPACITY};
use workpool_core::port::{JsonReportSink, LogReportSink, ReportSink, TaskExecutor, TextReportSink};
use workpool_infra_system::cipher_executor::DEFAULT_CIPHER_KEY;
use workpool_infra_system::{CipherExecutor, SubprocessExecutor};

#[derive(Parser, Debug)]
#[command(name = "workpool")]
#[command(about = "Encrypt or decrypt every file under a directory on a bounded worker pool", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory to process recursively (`~` is expanded)
    #[arg(env = "WORKPOOL_DIR")]
    pub dir: String,

    /// What to do with each file
    #[arg(short, long, value_enum, env = "WORKPOOL_ACTION", default_value_t = ActionArg::Encrypt)]
    pub action: ActionArg,

    /// Byte shift used by the built-in cipher
    #[arg(short, long, env = "WORKPOOL_CIPHER_KEY", default_value_t = DEFAULT_CIPHER_KEY)]
    pub key: u8,

    /// Number of worker threads (default: CPU core count, 2 if unknown)
    #[arg(short, long, env = "WORKPOOL_WORKERS")]
    pub workers: Option<usize>,

    /// Queued tasks before the producer blocks
    #[arg(long, env = "WORKPOOL_QUEUE_CAPACITY", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Completion report format on stdout (`log` sends reports to the logger)
    #[arg(long, value_enum, env = "WORKPOOL_REPORT", default_value_t = ReportFormat::Text)]
    pub report: ReportFormat,

    /// Run PROGRAM per task instead of the built-in cipher
    #[arg(long, value_name = "PROGRAM")]
    pub exec: Option<String>,

    /// Argument for --exec (repeatable); `{}` is replaced by the task token `<path>,<ACTION>`
    #[arg(long = "exec-arg", value_name = "ARG", requires = "exec", allow_hyphen_values = true)]
    pub exec_args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    Encrypt,
    Decrypt,
}

impl From<ActionArg> for CipherAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Encrypt => CipherAction::Encrypt,
            ActionArg::Decrypt => CipherAction::Decrypt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
    Log,
}

impl ReportFormat {
    pub fn build_sink(self) -> Box<dyn ReportSink> {
        match self {
            ReportFormat::Text => Box::new(TextReportSink::new(io::stdout())),
            ReportFormat::Json => Box::new(JsonReportSink::new(io::stdout())),
            ReportFormat::Log => Box::new(LogReportSink),
        }
    }
}

impl Cli {
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.workers, self.queue_capacity)
    }

    pub fn build_executor(&self) -> Arc<dyn TaskExecutor> {
        match &self.exec {
            Some(program) => Arc::new(SubprocessExecutor::with_default_env(
                program.clone(),
                self.exec_args.clone(),
            )),
            None => Arc::new(CipherExecutor::new(self.key)),
        }
    }
}
