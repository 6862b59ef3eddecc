//! Subprocess pipeline tests (unix only: relies on `sh`)
#![cfg(unix)]

use std::fs;
use std::sync::Arc;

use workpool_core::port::system_probe::mocks::FixedSystemProbe;
use workpool_core::port::LogReportSink;
use workpool_core::{PoolConfig, WorkerPool};
use workpool_infra_system::SubprocessExecutor;

#[test]
fn test_one_process_per_token() {
    let dir = std::env::temp_dir().join(format!("workpool-subprocess-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();

    let executor = SubprocessExecutor::with_default_env(
        "sh",
        vec![
            "-c".to_string(),
            "touch \"$0.done\"".to_string(),
            "{}".to_string(),
        ],
    );
    let pool = WorkerPool::new(
        PoolConfig::new(Some(3), 4),
        &FixedSystemProbe::new(None),
        Arc::new(executor),
        Box::new(LogReportSink),
    )
    .unwrap();

    for i in 0..10 {
        let path = dir.join(format!("t{}", i));
        assert!(pool.submit(&path.display()));
    }
    let summary = pool.shutdown();

    assert_eq!(summary.executed, 10);
    assert_eq!(summary.failed, 0);
    for i in 0..10 {
        assert!(dir.join(format!("t{}.done", i)).exists());
    }

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_failing_process_counts_as_failed_task() {
    let executor = SubprocessExecutor::with_default_env(
        "sh",
        vec!["-c".to_string(), "exit 3".to_string()],
    );
    let pool = WorkerPool::new(
        PoolConfig::new(Some(2), 4),
        &FixedSystemProbe::new(None),
        Arc::new(executor),
        Box::new(LogReportSink),
    )
    .unwrap();

    for i in 0..4 {
        assert!(pool.submit(&i));
    }
    let summary = pool.shutdown();

    assert_eq!(summary.executed, 4);
    assert_eq!(summary.failed, 4);
    assert_eq!(pool.live_workers(), 0);
}
