//! Result records, run statistics, aggregation, and the final summary.
mod aggregator;
mod completion;
mod logging;
mod stats;
mod summary;
mod types;

#[cfg(test)]
mod tests;

pub use aggregator::{AggregateReport, setup_aggregator};
pub use completion::{CompletionTracker, Progress};
pub use logging::LatencyLog;
pub use stats::RunStatistics;
pub use summary::{ERROR_ADVISORY, RunSummary, format_latency};
pub use types::{FailureReason, ResultRecord};
