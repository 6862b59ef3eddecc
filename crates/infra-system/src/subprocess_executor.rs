// Subprocess executor
// Runs one external process per task token, synchronously on the worker thread
use std::collections::HashMap;
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing::{info, warn};

use workpool_core::port::{ExecutionError, TaskExecutor};

/// Placeholder in argument templates replaced by the task token
pub const TOKEN_PLACEHOLDER: &str = "{}";

/// Environment variables passed to children unless configured otherwise
pub const DEFAULT_ENV_ALLOWLIST: &[&str] = &["PATH", "HOME", "USER"];

/// Subprocess executor
/// Spawns isolated child processes with environment allowlisting
pub struct SubprocessExecutor {
    program: String,
    args: Vec<String>,
    env_allowlist: Vec<String>,
}

impl SubprocessExecutor {
    /// Create a new subprocess executor
    ///
    /// # Arguments
    /// * `program` - Executable to run for every task
    /// * `args` - Argument template; every `{}` is replaced by the token.
    ///   If no argument contains `{}`, the token is appended as last argument.
    /// * `env_allowlist` - Variables inherited from this process; everything
    ///   else is cleared
    ///
    /// # Example
    /// ```ignore
    /// let executor = SubprocessExecutor::new(
    ///     "gzip",
    ///     vec!["-k".to_string(), "{}".to_string()],
    ///     vec!["PATH".to_string()],
    /// );
    /// ```
    pub fn new(program: impl Into<String>, args: Vec<String>, env_allowlist: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            env_allowlist,
        }
    }

    /// Executor with [`DEFAULT_ENV_ALLOWLIST`]
    pub fn with_default_env(program: impl Into<String>, args: Vec<String>) -> Self {
        Self::new(
            program,
            args,
            DEFAULT_ENV_ALLOWLIST.iter().map(|s| s.to_string()).collect(),
        )
    }

    /// Filter environment variables to allowlist only
    fn filter_env<I>(&self, env: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        env.into_iter()
            .filter(|(k, _)| self.env_allowlist.contains(k))
            .collect()
    }

    /// Expand the argument template for one token
    fn build_args(&self, token: &str) -> Vec<String> {
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|a| a.replace(TOKEN_PLACEHOLDER, token))
            .collect();

        if !self.args.iter().any(|a| a.contains(TOKEN_PLACEHOLDER)) {
            args.push(token.to_string());
        }
        args
    }
}

impl TaskExecutor for SubprocessExecutor {
    fn execute(&self, token: &str) -> Result<(), ExecutionError> {
        let args = self.build_args(token);
        // vars() would panic on non-UTF-8 entries; skip those instead
        let env = self.filter_env(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        );
        let started = Instant::now();

        info!(
            command = %self.program,
            args = ?args,
            "Starting subprocess execution"
        );

        let output = Command::new(&self.program)
            .args(&args)
            .env_clear()
            .envs(&env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ExecutionError::SpawnFailed(format!("{}: {}", self.program, e)))?;

        let duration_ms = started.elapsed().as_millis() as u64;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(
                command = %self.program,
                duration_ms,
                exit_code = ?output.status.code(),
                "Subprocess exited unsuccessfully"
            );
            return Err(ExecutionError::NonZeroExit {
                code: output.status.code(),
                stderr,
            });
        }

        info!(
            command = %self.program,
            duration_ms,
            exit_code = ?output.status.code(),
            "Subprocess execution completed"
        );
        Ok(())
    }
}
