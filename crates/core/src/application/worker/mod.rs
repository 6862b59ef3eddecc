// Worker Pool - fixed set of consume/execute/report loops

pub mod constants;
mod panic_guard;
mod reporter;
mod shutdown;

use constants::*;
pub use panic_guard::{execute_guarded, PanicGuardResult};
pub use reporter::Reporter;
pub use shutdown::StopSignal;

use crate::application::queue::BoundedTaskQueue;
use crate::domain::{PoolConfig, TaskToken};
use crate::error::{PoolError, Result};
use crate::port::time_provider::SystemTimeProvider;
use crate::port::{
    CompletionReport, ReportSink, SystemProbe, TaskExecutor, TaskOutcome, TimeProvider,
};
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{error, info, warn};

/// Counters shared by all workers of one pool
#[derive(Debug, Default)]
struct PoolCounters {
    live: AtomicUsize,
    executed: AtomicUsize,
    failed: AtomicUsize,
    abnormal_exits: AtomicUsize,
}

/// Pool totals, as returned by [`WorkerPool::shutdown`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownSummary {
    /// Workers launched at construction
    pub workers: usize,
    /// Tasks taken off the queue and run, whatever their outcome
    pub executed: usize,
    /// Subset of `executed` that failed or panicked
    pub failed: usize,
    /// Worker threads whose join reported a panic
    pub abnormal_exits: usize,
}

/// Fixed-size pool of worker threads bound to one [`BoundedTaskQueue`]
///
/// Workers start in [`WorkerPool::new`] and are joined by
/// [`WorkerPool::shutdown`] (or on drop). The worker count never changes
/// in between.
pub struct WorkerPool {
    queue: Arc<BoundedTaskQueue>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    worker_count: usize,
    counters: Arc<PoolCounters>,
}

impl WorkerPool {
    /// Create a pool and launch its workers
    ///
    /// # Arguments
    /// * `config` - Worker count and queue capacity
    /// * `probe` - Core-count hint used when `config.workers` is `None`
    /// * `executor` - Work performed per token
    /// * `sink` - Destination of completion reports
    ///
    /// # Errors
    /// - `PoolError::Config` for a zero capacity or zero worker count
    /// - `PoolError::Spawn` if the OS refuses a thread; workers started
    ///   so far are stopped and joined first
    pub fn new(
        config: PoolConfig,
        probe: &dyn SystemProbe,
        executor: Arc<dyn TaskExecutor>,
        sink: Box<dyn ReportSink>,
    ) -> Result<Self> {
        Self::with_time_provider(config, probe, executor, sink, Arc::new(SystemTimeProvider))
    }

    /// Same as [`WorkerPool::new`] with an explicit clock for report timestamps
    pub fn with_time_provider(
        config: PoolConfig,
        probe: &dyn SystemProbe,
        executor: Arc<dyn TaskExecutor>,
        sink: Box<dyn ReportSink>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Result<Self> {
        config.validate()?;

        let worker_count = config.worker_count(probe);
        let queue = Arc::new(BoundedTaskQueue::new(config.queue_capacity)?);
        let reporter = Arc::new(Reporter::new(sink));
        let counters = Arc::new(PoolCounters::default());

        info!(
            workers = worker_count,
            queue_capacity = config.queue_capacity,
            "Launching worker threads"
        );

        let mut handles = Vec::with_capacity(worker_count);
        for id in 0..worker_count {
            let worker = Worker {
                id,
                queue: Arc::clone(&queue),
                executor: Arc::clone(&executor),
                reporter: Arc::clone(&reporter),
                time_provider: Arc::clone(&time_provider),
                counters: Arc::clone(&counters),
            };

            // Counted before spawn so live_workers() == worker_count right after new()
            counters.live.fetch_add(1, Ordering::SeqCst);
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", WORKER_THREAD_PREFIX, id))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    counters.live.fetch_sub(1, Ordering::SeqCst);
                    error!(worker_id = id, error = %e, "Failed to spawn worker thread");
                    queue.request_stop();
                    join_workers(handles, &counters);
                    return Err(PoolError::Spawn(e));
                }
            }
        }

        Ok(Self {
            queue,
            handles: Mutex::new(handles),
            worker_count,
            counters,
        })
    }

    /// Render `task` into a token and enqueue it, blocking while the queue is full
    ///
    /// Returns false once stop has been requested; the task is dropped.
    pub fn submit<T: fmt::Display + ?Sized>(&self, task: &T) -> bool {
        self.submit_token(TaskToken::render(task))
    }

    /// Enqueue an already rendered token
    pub fn submit_token(&self, token: TaskToken) -> bool {
        self.queue.submit(token)
    }

    /// Stop accepting tasks; workers drain the queue and exit
    ///
    /// Does not wait. Use [`WorkerPool::shutdown`] to join.
    pub fn request_stop(&self) -> bool {
        let first = self.queue.request_stop();
        if first {
            info!("Stop requested, draining queue");
        }
        first
    }

    /// Request stop and join every worker
    ///
    /// Tasks already queued are executed first. Safe to call more than
    /// once and from several threads: every caller returns after all
    /// workers have exited.
    pub fn shutdown(&self) -> ShutdownSummary {
        self.request_stop();

        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        if !handles.is_empty() {
            info!(workers = handles.len(), "Shutting down worker threads...");
            join_workers(std::mem::take(&mut *handles), &self.counters);

            let summary = self.summary();
            info!(
                executed = summary.executed,
                failed = summary.failed,
                abnormal_exits = summary.abnormal_exits,
                "All worker threads shut down"
            );
        }
        drop(handles);

        self.summary()
    }

    /// Current totals; final once `shutdown` has returned
    pub fn summary(&self) -> ShutdownSummary {
        ShutdownSummary {
            workers: self.worker_count,
            executed: self.counters.executed.load(Ordering::SeqCst),
            failed: self.counters.failed.load(Ordering::SeqCst),
            abnormal_exits: self.counters.abnormal_exits.load(Ordering::SeqCst),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Workers whose loop has not exited yet
    ///
    /// Lower than `worker_count()` before shutdown means a worker died.
    pub fn live_workers(&self) -> usize {
        self.counters.live.load(Ordering::SeqCst)
    }

    /// Tokens waiting in the queue
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub fn is_stopping(&self) -> bool {
        self.queue.is_stopping()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn join_workers(handles: Vec<JoinHandle<()>>, counters: &PoolCounters) {
    for handle in handles {
        let name = handle.thread().name().unwrap_or("worker").to_string();
        if handle.join().is_err() {
            counters.abnormal_exits.fetch_add(1, Ordering::SeqCst);
            error!(thread = %name, "Worker thread exited abnormally");
        }
    }
}

/// Decrements the live-worker count however the loop ends
struct LiveGuard<'a>(&'a AtomicUsize);

impl Drop for LiveGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// One consume/execute/report loop
struct Worker {
    id: usize,
    queue: Arc<BoundedTaskQueue>,
    executor: Arc<dyn TaskExecutor>,
    reporter: Arc<Reporter>,
    time_provider: Arc<dyn TimeProvider>,
    counters: Arc<PoolCounters>,
}

impl Worker {
    fn run(self) {
        let _live = LiveGuard(&self.counters.live);
        info!(worker_id = self.id, "Worker started");

        // None = stop requested and queue drained
        while let Some(token) = self.queue.try_dequeue() {
            self.execute(token);
        }

        info!(worker_id = self.id, "Worker stopped");
    }

    fn execute(&self, token: TaskToken) {
        let executor = &self.executor;
        let started = Instant::now();
        let result = execute_guarded(AssertUnwindSafe(|| executor.execute(token.as_str())));
        let elapsed = started.elapsed();

        let outcome = match result {
            PanicGuardResult::Success(Ok(())) => TaskOutcome::Succeeded,
            PanicGuardResult::Success(Err(e)) => {
                warn!(worker_id = self.id, token = %token, error = %e, "Task execution failed");
                TaskOutcome::Failed(e.to_string())
            }
            PanicGuardResult::Panicked(msg) => TaskOutcome::Panicked(msg),
        };

        self.counters.executed.fetch_add(1, Ordering::SeqCst);
        if !outcome.is_success() {
            self.counters.failed.fetch_add(1, Ordering::SeqCst);
        }

        let report = CompletionReport {
            worker_id: self.id,
            token: token.into_string(),
            elapsed,
            outcome,
            finished_at_ms: self.time_provider.now_millis(),
        };
        let reporter = &self.reporter;
        if let PanicGuardResult::Panicked(msg) =
            execute_guarded(AssertUnwindSafe(|| reporter.report(&report)))
        {
            warn!(
                worker_id = self.id,
                token = %report.token,
                panic_msg = %msg,
                "Report sink panicked, report dropped"
            );
        }
    }
}
