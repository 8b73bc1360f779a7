use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::{sync::mpsc, time::Instant};
use tracing::debug;

use crate::{
    args::{PositiveU64, PositiveUsize, TesterArgs, default_worker_count},
    error::{AppError, AppResult, HttpError, SinkError},
    http::{RequestSpec, Transport, WorkerPool, WorkerShared, spawn_dispatcher},
    metrics::{CompletionTracker, LatencyLog, RunStatistics, RunSummary, setup_aggregator},
    shutdown::ShutdownSender,
};

/// Run-wide knobs resolved from arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub total: PositiveU64,
    /// 0 = unthrottled.
    pub rps: u64,
    pub workers: PositiveUsize,
    pub abort_on_error: bool,
    pub latency_log: Option<PathBuf>,
}

impl RunSettings {
    /// Resolves defaults (`workers = 0` becomes the CPU count).
    ///
    /// # Errors
    ///
    /// Returns an error when an explicit worker count is not positive.
    pub fn from_args(args: &TesterArgs) -> AppResult<Self> {
        let workers = match args.workers {
            0 => PositiveUsize::from(default_worker_count()),
            count => PositiveUsize::try_from(count)?,
        };
        Ok(Self {
            total: args.requests,
            rps: args.rps,
            workers,
            abort_on_error: args.abort_on_error,
            latency_log: args.fout.clone(),
        })
    }
}

#[derive(Debug)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub stats: RunStatistics,
    /// Dispatch signals handed to the workers.
    pub issued: u64,
    /// The run stopped on shutdown before all requests completed.
    pub cancelled: bool,
    pub log_error: Option<SinkError>,
}

/// Drives one run: dispatcher, worker pool, and aggregator.
///
/// Both queues are bounded by the worker count; the intake bound is what
/// holds dispatch back when every worker is busy. The run is complete when
/// the aggregator has seen `settings.total` records, or earlier on
/// shutdown, in which case in-flight requests still report.
///
/// # Errors
///
/// Returns an error when the latency log cannot be created, a task panics,
/// or `abort_on_error` is set and a network error occurred.
pub async fn execute_run(
    settings: &RunSettings,
    spec: RequestSpec,
    transport: Arc<dyn Transport>,
    shutdown_tx: &ShutdownSender,
) -> AppResult<RunOutcome> {
    let latency_log = match settings.latency_log.as_deref() {
        Some(path) => Some(LatencyLog::create(path).await.map_err(AppError::sink)?),
        None => None,
    };

    let queue_capacity = settings.workers.get();
    let (intake_tx, intake_rx) = mpsc::channel(queue_capacity);
    let (records_tx, records_rx) = mpsc::channel(queue_capacity);
    let tracker = CompletionTracker::new();
    let mut shutdown_rx = shutdown_tx.subscribe();

    let aggregator = setup_aggregator(records_rx, latency_log, tracker.clone());
    let pool = WorkerPool::spawn(
        settings.workers,
        WorkerShared::new(transport, spec, settings.abort_on_error),
        intake_rx,
        records_tx,
        shutdown_tx,
    );
    debug!("Spawned {} workers", pool.size());

    let run_start = Instant::now();
    let dispatcher = spawn_dispatcher(
        settings.total,
        settings.rps,
        intake_tx,
        tracker.clone(),
        shutdown_tx,
    );

    let cancelled = tokio::select! {
        completed = tracker.wait_for_completed(settings.total.get()) => !completed,
        _ = shutdown_rx.recv() => true,
    };

    let issued = dispatcher.await?;
    pool.join().await?;
    let report = aggregator.await?;

    let elapsed = report
        .last_completion
        .map_or(Duration::ZERO, |last| last.saturating_duration_since(run_start));

    if settings.abort_on_error
        && let Some(message) = report.stats.first_network_error()
    {
        return Err(AppError::http(HttpError::AbortedOnNetworkError {
            message: message.to_owned(),
        }));
    }

    Ok(RunOutcome {
        summary: RunSummary::from_stats(&report.stats, elapsed),
        stats: report.stats,
        issued,
        cancelled,
        log_error: report.log_error,
    })
}
