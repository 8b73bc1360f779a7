use tokio::{sync::mpsc, task::JoinHandle, time::Instant};
use tracing::{debug, error};

use crate::error::SinkError;

use super::{CompletionTracker, LatencyLog, ResultRecord, RunStatistics};

/// What the aggregator hands back once the record stream closes.
#[derive(Debug)]
pub struct AggregateReport {
    pub stats: RunStatistics,
    /// When the last record was observed; `None` if nothing arrived.
    pub last_completion: Option<Instant>,
    /// First latency-log failure. Logging stops after it; counting does not.
    pub log_error: Option<SinkError>,
}

/// Spawns the single consumer of result records.
///
/// The task is the only writer of [`RunStatistics`]. It ends when every
/// sender of `records_rx` has been dropped.
#[must_use]
pub fn setup_aggregator(
    mut records_rx: mpsc::Receiver<ResultRecord>,
    latency_log: Option<LatencyLog>,
    tracker: CompletionTracker,
) -> JoinHandle<AggregateReport> {
    tokio::spawn(async move {
        let mut stats = RunStatistics::new();
        let mut latency_log = latency_log;
        let mut log_error: Option<SinkError> = None;
        let mut last_completion = None;

        while let Some(record) = records_rx.recv().await {
            let sequence = stats.record(&record);
            if let ResultRecord::Success { latency_nanos } = record
                && let Some(sequence) = sequence
                && let Some(log) = latency_log.as_mut()
                && let Err(err) = log.append(sequence, latency_nanos).await
            {
                error!("Failed to write latency log: {}", err);
                latency_log = None;
                log_error = Some(err);
            }
            last_completion = Some(Instant::now());
            let progress = tracker.complete();
            debug!(
                "Completed {}/{} dispatched requests",
                progress.completed, progress.issued
            );
        }

        if let Some(log) = latency_log
            && let Err(err) = log.finish().await
        {
            error!("Failed to flush latency log: {}", err);
            if log_error.is_none() {
                log_error = Some(err);
            }
        }

        AggregateReport {
            stats,
            last_completion,
            log_error,
        }
    })
}
