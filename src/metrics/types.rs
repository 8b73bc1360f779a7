use std::time::Duration;

/// Outcome of one request attempt, emitted by a worker.
///
/// Records carry no sequence number; ordinals are assigned by the aggregator
/// in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultRecord {
    Success { latency_nanos: u64 },
    Failure(FailureReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The transport failed before a status was available (connect, DNS,
    /// timeout, malformed response, body read).
    Network { message: String },
    /// The target answered with something other than 200.
    NonOkStatus { status: u16 },
}

impl ResultRecord {
    #[must_use]
    pub fn success(latency: Duration) -> Self {
        ResultRecord::Success {
            latency_nanos: u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, ResultRecord::Success { .. })
    }

    #[must_use]
    pub const fn is_network_failure(&self) -> bool {
        matches!(self, ResultRecord::Failure(FailureReason::Network { .. }))
    }
}
