//! Producer side: turn a directory tree into file tasks

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use workpool_core::domain::{CipherAction, FileTask};
use workpool_core::WorkerPool;

/// What the producer managed to hand over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProduceStats {
    pub submitted: usize,
    /// True if the pool started rejecting before the walk finished
    pub interrupted: bool,
}

/// Submit one `FileTask` per regular file under `root`, in sorted order
///
/// Blocks whenever the pool's queue is full. Stops at the first rejected
/// submission (the pool is stopping). Symlinks are not followed.
///
/// # Errors
/// Any I/O error while listing a directory.
pub fn submit_directory(
    pool: &WorkerPool,
    root: &Path,
    action: CipherAction,
) -> io::Result<ProduceStats> {
    let mut stats = ProduceStats::default();

    walk(root, &mut |path: PathBuf| {
        if pool.submit(&FileTask::new(path, action)) {
            stats.submitted += 1;
            true
        } else {
            warn!("Pool is stopping, no further tasks will be submitted");
            stats.interrupted = true;
            false
        }
    })?;

    Ok(stats)
}

/// Depth-first walk; `visit` returns false to stop early.
/// Returns false if the walk was stopped.
fn walk(dir: &Path, visit: &mut dyn FnMut(PathBuf) -> bool) -> io::Result<bool> {
    let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let file_type = entry.file_type()?;
        let path = entry.path();

        if file_type.is_dir() {
            if !walk(&path, visit)? {
                return Ok(false);
            }
        } else if file_type.is_file() {
            if !visit(path) {
                return Ok(false);
            }
        } else {
            debug!(path = %path.display(), "Skipping non-regular file");
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use workpool_core::port::system_probe::mocks::FixedSystemProbe;
    use workpool_core::port::task_executor::mocks::MockTaskExecutor;
    use workpool_core::port::LogReportSink;
    use workpool_core::PoolConfig;

    fn scratch_tree() -> PathBuf {
        let root = std::env::temp_dir().join(format!("workpool-producer-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(root.join("nested/deeper")).unwrap();
        fs::write(root.join("b.txt"), b"b").unwrap();
        fs::write(root.join("a.txt"), b"a").unwrap();
        fs::write(root.join("nested/c.txt"), b"c").unwrap();
        fs::write(root.join("nested/deeper/d.txt"), b"d").unwrap();
        root
    }

    fn single_worker_pool(executor: Arc<MockTaskExecutor>) -> WorkerPool {
        WorkerPool::new(
            PoolConfig::new(Some(1), 2),
            &FixedSystemProbe::new(None),
            executor,
            Box::new(LogReportSink),
        )
        .unwrap()
    }

    #[test]
    fn test_submits_every_file_in_sorted_order() {
        let root = scratch_tree();
        let executor = Arc::new(MockTaskExecutor::new_success());
        let pool = single_worker_pool(Arc::clone(&executor));

        let stats = submit_directory(&pool, &root, CipherAction::Encrypt).unwrap();
        pool.shutdown();

        assert_eq!(stats, ProduceStats { submitted: 4, interrupted: false });
        let expected: Vec<String> = ["a.txt", "b.txt", "nested/c.txt", "nested/deeper/d.txt"]
            .iter()
            .map(|p| FileTask::new(root.join(p), CipherAction::Encrypt).to_string())
            .collect();
        // Single worker executes in submission order
        assert_eq!(executor.calls(), expected);

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_stopped_pool_interrupts_walk() {
        let root = scratch_tree();
        let executor = Arc::new(MockTaskExecutor::new_success());
        let pool = single_worker_pool(Arc::clone(&executor));
        pool.request_stop();

        let stats = submit_directory(&pool, &root, CipherAction::Decrypt).unwrap();
        assert_eq!(stats, ProduceStats { submitted: 0, interrupted: true });
        assert_eq!(pool.shutdown().executed, 0);

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_missing_root_is_error() {
        let executor = Arc::new(MockTaskExecutor::new_success());
        let pool = single_worker_pool(executor);
        let missing = std::env::temp_dir().join(format!("workpool-missing-{}", uuid::Uuid::new_v4()));

        assert!(submit_directory(&pool, &missing, CipherAction::Encrypt).is_err());
    }
}
