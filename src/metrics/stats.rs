use super::types::{FailureReason, ResultRecord};

/// Running statistics owned by the aggregator task.
///
/// Latency sum and extrema cover successes only. The minimum starts at
/// `u64::MAX` and the maximum at zero, so they are only meaningful once at
/// least one success has been recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStatistics {
    successes: u64,
    errors: u64,
    network_errors: u64,
    latency_sum_nanos: u128,
    min_latency_nanos: u64,
    max_latency_nanos: u64,
    first_network_error: Option<String>,
}

impl Default for RunStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStatistics {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            successes: 0,
            errors: 0,
            network_errors: 0,
            latency_sum_nanos: 0,
            min_latency_nanos: u64::MAX,
            max_latency_nanos: 0,
            first_network_error: None,
        }
    }

    /// Folds one record into the statistics.
    ///
    /// Returns the 1-based ordinal of the success when the record is a
    /// success, `None` for failures.
    pub fn record(&mut self, record: &ResultRecord) -> Option<u64> {
        match record {
            ResultRecord::Success { latency_nanos } => Some(self.record_success(*latency_nanos)),
            ResultRecord::Failure(reason) => {
                self.record_failure(reason);
                None
            }
        }
    }

    fn record_success(&mut self, latency_nanos: u64) -> u64 {
        self.successes = self.successes.saturating_add(1);
        self.latency_sum_nanos = self
            .latency_sum_nanos
            .saturating_add(u128::from(latency_nanos));
        if latency_nanos < self.min_latency_nanos {
            self.min_latency_nanos = latency_nanos;
        }
        if latency_nanos > self.max_latency_nanos {
            self.max_latency_nanos = latency_nanos;
        }
        self.successes
    }

    fn record_failure(&mut self, reason: &FailureReason) {
        self.errors = self.errors.saturating_add(1);
        if let FailureReason::Network { message } = reason {
            self.network_errors = self.network_errors.saturating_add(1);
            if self.first_network_error.is_none() {
                self.first_network_error = Some(message.clone());
            }
        }
    }

    #[must_use]
    pub const fn successes(&self) -> u64 {
        self.successes
    }

    #[must_use]
    pub const fn errors(&self) -> u64 {
        self.errors
    }

    #[must_use]
    pub const fn network_errors(&self) -> u64 {
        self.network_errors
    }

    /// Requests that produced a record, successful or not.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.successes.saturating_add(self.errors)
    }

    #[must_use]
    pub const fn latency_sum_nanos(&self) -> u128 {
        self.latency_sum_nanos
    }

    #[must_use]
    pub const fn best_nanos(&self) -> Option<u64> {
        if self.successes == 0 {
            None
        } else {
            Some(self.min_latency_nanos)
        }
    }

    #[must_use]
    pub const fn worst_nanos(&self) -> Option<u64> {
        if self.successes == 0 {
            None
        } else {
            Some(self.max_latency_nanos)
        }
    }

    /// Average success latency, truncated to whole nanoseconds.
    #[must_use]
    pub fn average_nanos(&self) -> Option<u64> {
        let avg = self
            .latency_sum_nanos
            .checked_div(u128::from(self.successes))?;
        Some(u64::try_from(avg).unwrap_or(u64::MAX))
    }

    #[must_use]
    pub fn first_network_error(&self) -> Option<&str> {
        self.first_network_error.as_deref()
    }
}
