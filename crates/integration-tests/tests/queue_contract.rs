//! Queue & pool contract tests
//!
//! Producer/consumer hand-off, drain and rejection through the public API.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use workpool_core::port::system_probe::mocks::FixedSystemProbe;
use workpool_core::port::task_executor::mocks::MockTaskExecutor;
use workpool_core::port::{CompletionReport, JsonReportSink, ReportSink};
use workpool_core::{BoundedTaskQueue, PoolConfig, TaskToken, WorkerPool};
use workpool_infra_system::SystemProbeImpl;

const BLOCKED_WAIT: Duration = Duration::from_millis(150);
const UNBLOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Capacity 2, one consumer: A and B fill the queue, C blocks in a second
/// thread until A is taken; execution order is A, B, C.
#[test]
fn test_blocked_submit_resumes_after_dequeue_and_keeps_order() {
    let queue = Arc::new(BoundedTaskQueue::new(2).unwrap());
    assert!(queue.submit(TaskToken::new("A")));
    assert!(queue.submit(TaskToken::new("B")));

    let (done_tx, done_rx) = mpsc::channel();
    let second = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || done_tx.send(queue.submit(TaskToken::new("C"))).unwrap())
    };
    assert!(done_rx.recv_timeout(BLOCKED_WAIT).is_err(), "C must block while full");

    let mut order = vec![queue.try_dequeue().unwrap()];
    assert_eq!(done_rx.recv_timeout(UNBLOCK_TIMEOUT), Ok(true));
    second.join().unwrap();

    queue.request_stop();
    while let Some(token) = queue.try_dequeue() {
        order.push(token);
    }
    let order: Vec<&str> = order.iter().map(TaskToken::as_str).collect();
    assert_eq!(order, vec!["A", "B", "C"]);
}

#[test]
fn test_single_producer_fifo_through_one_worker() {
    let executor = Arc::new(MockTaskExecutor::new_success());
    let pool = WorkerPool::new(
        PoolConfig::new(Some(1), 4),
        &FixedSystemProbe::new(None),
        executor.clone(),
        Box::new(JsonReportSink::new(std::io::sink())),
    )
    .unwrap();

    let expected: Vec<String> = (0..200).map(|i| format!("job-{:03}", i)).collect();
    for token in &expected {
        assert!(pool.submit(token));
    }
    pool.shutdown();

    assert_eq!(executor.calls(), expected);
}

#[test]
fn test_drain_runs_every_task_exactly_once() {
    let executor = Arc::new(MockTaskExecutor::new_success());
    let pool = WorkerPool::new(
        PoolConfig::new(Some(4), 64),
        &SystemProbeImpl::new(),
        executor.clone(),
        Box::new(JsonReportSink::new(std::io::sink())),
    )
    .unwrap();

    for i in 0..64 {
        assert!(pool.submit(&i));
    }
    let summary = pool.shutdown();

    assert_eq!(summary.executed, 64);
    let mut calls: Vec<u32> = executor
        .calls()
        .iter()
        .map(|c| c.parse().unwrap())
        .collect();
    calls.sort_unstable();
    assert_eq!(calls, (0..64).collect::<Vec<u32>>());
}

#[test]
fn test_post_shutdown_submit_returns_false_quickly() {
    let pool = WorkerPool::new(
        PoolConfig::new(None, 1),
        &SystemProbeImpl::new(),
        Arc::new(MockTaskExecutor::new_success()),
        Box::new(JsonReportSink::new(std::io::sink())),
    )
    .unwrap();
    assert!(pool.worker_count() >= 1);
    pool.shutdown();
    assert_eq!(pool.live_workers(), 0);

    let started = Instant::now();
    for _ in 0..100 {
        assert!(!pool.submit("too late"));
    }
    assert!(started.elapsed() < UNBLOCK_TIMEOUT);
}

/// Sink that forwards each report over a channel
struct ChannelSink(mpsc::Sender<CompletionReport>);

impl ReportSink for ChannelSink {
    fn emit(&mut self, report: &CompletionReport) -> std::io::Result<()> {
        self.0
            .send(report.clone())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::BrokenPipe, e.to_string()))
    }
}

#[test]
fn test_failed_task_does_not_stop_later_tasks() {
    let executor = Arc::new(MockTaskExecutor::new_success().failing_on("poison"));
    let (tx, rx) = mpsc::channel();
    let pool = WorkerPool::new(
        PoolConfig::new(Some(1), 8),
        &FixedSystemProbe::new(None),
        executor.clone(),
        Box::new(ChannelSink(tx)),
    )
    .unwrap();

    for token in ["first", "poison", "after-1", "after-2"] {
        assert!(pool.submit(token));
    }

    let reports: Vec<CompletionReport> = (0..4)
        .map(|_| rx.recv_timeout(UNBLOCK_TIMEOUT).unwrap())
        .collect();
    let summary = pool.shutdown();

    let tokens: Vec<&str> = reports.iter().map(|r| r.token.as_str()).collect();
    assert_eq!(tokens, vec!["first", "poison", "after-1", "after-2"]);
    assert!(!reports[1].outcome.is_success());
    assert!(reports[3].outcome.is_success());
    assert_eq!(summary.failed, 1);
    assert!(reports.iter().all(|r| r.worker_id == 0));
}
