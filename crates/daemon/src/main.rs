//! Workpool - Main Entry Point
//! Walks a directory and runs one task per file on a bounded worker pool

mod cli;
mod producer;
mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use cli::Cli;
use workpool_core::domain::CipherAction;
use workpool_core::WorkerPool;
use workpool_infra_system::SystemProbeImpl;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit status for a forced stop (128 + SIGINT)
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Parse CLI (also reads WORKPOOL_* env vars)
    let cli = Cli::parse();

    // 2. Initialize logging
    telemetry::init_logging()?;
    info!("Workpool v{} starting...", VERSION);

    // 3. Wire dependencies
    let root = PathBuf::from(shellexpand::tilde(&cli.dir).into_owned());
    let action: CipherAction = cli.action.into();
    let probe = SystemProbeImpl::new();

    let started = Instant::now();
    let pool = Arc::new(
        WorkerPool::new(
            cli.pool_config(),
            &probe,
            cli.build_executor(),
            cli.report.build_sink(),
        )
        .context("Failed to start worker pool")?,
    );
    info!(root = %root.display(), workers = pool.worker_count(), "Worker pool ready");

    // 4. Produce on a blocking thread: submit() may block on a full queue
    let producer = tokio::task::spawn_blocking({
        let pool = Arc::clone(&pool);
        let root = root.clone();
        move || producer::submit_directory(&pool, &root, action)
    });
    tokio::pin!(producer);

    // 5. Ctrl+C stops intake; queued tasks still drain
    let produced = tokio::select! {
        res = &mut producer => res?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupt received, rejecting new tasks and draining the queue");
            pool.request_stop();
            producer.await?
        }
    };

    // 6. Graceful shutdown: join every worker. ctrl_c() has replaced the
    // default SIGINT handler by now, so a second Ctrl+C must exit here.
    let joiner = tokio::task::spawn_blocking({
        let pool = Arc::clone(&pool);
        move || pool.shutdown()
    });
    let summary = match join_or_interrupt(joiner, tokio::signal::ctrl_c()).await? {
        Some(summary) => summary,
        None => {
            warn!(
                queued = pool.queued(),
                "Second interrupt received, exiting without draining"
            );
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    };

    let stats = produced.with_context(|| format!("Failed to walk {}", root.display()))?;
    if stats.interrupted {
        warn!(submitted = stats.submitted, "Intake was interrupted before the walk finished");
    }

    println!(
        "Processed {} task(s) with {} worker(s) in {} seconds",
        summary.executed,
        summary.workers,
        started.elapsed().as_secs_f64()
    );
    if summary.failed > 0 {
        warn!(failed = summary.failed, "Some tasks failed");
    }

    info!("Shutdown complete.");
    Ok(())
}

/// Wait for `joiner`, or return `None` if `interrupt` fires first
async fn join_or_interrupt<T, I>(joiner: JoinHandle<T>, interrupt: I) -> Result<Option<T>>
where
    I: Future,
{
    tokio::select! {
        res = joiner => Ok(Some(res?)),
        _ = interrupt => Ok(None),
    }
}
