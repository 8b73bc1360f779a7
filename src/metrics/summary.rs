use std::time::Duration;

use super::RunStatistics;

pub const ERROR_ADVISORY: &str = "You had errors in some of your requests, use the --echo option to find what those errors were. Requests with errors are not counted towards rps, average, worst and best.";

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Final report derived once from the aggregated statistics.
///
/// Rates are fixed point in hundredths and truncated, so `error_rate_x100`
/// of `5000` means `50.00%`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub error_requests: u64,
    pub elapsed: Duration,
    pub rps_x100: u64,
    pub avg_latency: Option<Duration>,
    pub worst_latency: Option<Duration>,
    pub best_latency: Option<Duration>,
    pub error_rate_x100: u64,
}

impl RunSummary {
    #[must_use]
    pub fn from_stats(stats: &RunStatistics, elapsed: Duration) -> Self {
        let total = stats.total();
        let successes = stats.successes();
        let errors = stats.errors();

        let rps_x100 = u128::from(successes)
            .saturating_mul(100)
            .saturating_mul(NANOS_PER_SECOND)
            .checked_div(elapsed.as_nanos())
            .map_or(0, |value| u64::try_from(value).unwrap_or(u64::MAX));

        let error_rate_x100 = u128::from(errors)
            .saturating_mul(10_000)
            .checked_div(u128::from(total))
            .map_or(0, |value| u64::try_from(value).unwrap_or(u64::MAX));

        Self {
            total_requests: total,
            successful_requests: successes,
            error_requests: errors,
            elapsed,
            rps_x100,
            avg_latency: stats.average_nanos().map(Duration::from_nanos),
            worst_latency: stats.worst_nanos().map(Duration::from_nanos),
            best_latency: stats.best_nanos().map(Duration::from_nanos),
            error_rate_x100,
        }
    }

    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.error_requests > 0
    }

    /// `Rps: <f> Avg: <dur> Worst: <dur> Best: <dur> Errors: <pct>%`
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "Rps: {} Avg: {} Worst: {} Best: {} Errors: {}%",
            format_x100(self.rps_x100),
            format_latency(self.avg_latency),
            format_latency(self.worst_latency),
            format_latency(self.best_latency),
            format_x100(self.error_rate_x100),
        )
    }
}

/// Formats a latency the way `Duration`'s debug output does (`10.5ms`);
/// `n/a` when there were no successes.
#[must_use]
pub fn format_latency(latency: Option<Duration>) -> String {
    latency.map_or_else(|| "n/a".to_owned(), |value| format!("{:?}", value))
}

fn format_x100(value: u64) -> String {
    format!("{}.{:02}", value / 100, value % 100)
}
