// Task Executor Port
// Abstraction for the work performed per task token

use thiserror::Error;

/// Execution errors
///
/// Always contained inside the worker loop; they end up in a
/// completion report, never in the producer.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Invalid task token: {0}")]
    InvalidToken(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Process exited with code {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("Task failed: {0}")]
    Failed(String),
}

impl From<crate::domain::DomainError> for ExecutionError {
    fn from(err: crate::domain::DomainError) -> Self {
        ExecutionError::InvalidToken(err.to_string())
    }
}

/// Task Executor trait
///
/// Called from worker threads with no queue lock held. Implementations:
/// - CipherExecutor: shifts the bytes of the file named by the token
/// - SubprocessExecutor: spawns an external process per token
pub trait TaskExecutor: Send + Sync {
    /// Execute one task given its token
    ///
    /// # Errors
    /// Any error marks the task as failed; the worker keeps running.
    fn execute(&self, token: &str) -> Result<(), ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Condvar, Mutex};
    use std::time::{Duration, Instant};

    /// Mock executor behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always succeed
        Success,
        /// Always fail with message
        Fail(String),
        /// Panic with message (for panic isolation testing)
        Panic(String),
    }

    /// Mock Task Executor for testing
    ///
    /// Records every token it sees. While the gate is closed, calls block
    /// after recording, which lets tests pin a worker inside `execute`.
    pub struct MockTaskExecutor {
        behavior: MockBehavior,
        failing_tokens: HashSet<String>,
        calls: Mutex<Vec<String>>,
        calls_changed: Condvar,
        gate_open: Mutex<bool>,
        gate_changed: Condvar,
    }

    impl MockTaskExecutor {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                failing_tokens: HashSet::new(),
                calls: Mutex::new(Vec::new()),
                calls_changed: Condvar::new(),
                gate_open: Mutex::new(true),
                gate_changed: Condvar::new(),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success)
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(message.into()))
        }

        pub fn new_panic_inducing(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Panic(message.into()))
        }

        /// Fail only for the given token, succeed (per behavior) for the rest
        pub fn failing_on(mut self, token: impl Into<String>) -> Self {
            self.failing_tokens.insert(token.into());
            self
        }

        /// Start with the gate closed
        pub fn gated(self) -> Self {
            *self.gate_open.lock().unwrap() = false;
            self
        }

        pub fn open_gate(&self) {
            *self.gate_open.lock().unwrap() = true;
            self.gate_changed.notify_all();
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        /// Block until at least `n` calls were recorded or the timeout expires
        pub fn wait_for_calls(&self, n: usize, timeout: Duration) -> bool {
            let deadline = Instant::now() + timeout;
            let mut calls = self.calls.lock().unwrap();
            while calls.len() < n {
                let now = Instant::now();
                if now >= deadline {
                    return false;
                }
                calls = self
                    .calls_changed
                    .wait_timeout(calls, deadline - now)
                    .unwrap()
                    .0;
            }
            true
        }
    }

    impl TaskExecutor for MockTaskExecutor {
        fn execute(&self, token: &str) -> Result<(), ExecutionError> {
            self.calls.lock().unwrap().push(token.to_string());
            self.calls_changed.notify_all();

            let mut open = self.gate_open.lock().unwrap();
            while !*open {
                open = self.gate_changed.wait(open).unwrap();
            }
            drop(open);

            if self.failing_tokens.contains(token) {
                return Err(ExecutionError::Failed(format!("rejected {}", token)));
            }

            match &self.behavior {
                MockBehavior::Success => Ok(()),
                MockBehavior::Fail(msg) => Err(ExecutionError::Failed(msg.clone())),
                MockBehavior::Panic(msg) => {
                    panic!("{}", msg); // Actually panic for panic isolation testing
                }
            }
        }
    }
}
