use std::sync::Arc;

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub issued: u64,
    pub completed: u64,
}

/// Counts issued and completed requests so the run can wait for exactly N
/// completions.
///
/// The dispatcher calls [`CompletionTracker::issue`] before each enqueue and
/// the aggregator calls [`CompletionTracker::complete`] after each record.
#[derive(Debug, Clone)]
pub struct CompletionTracker {
    tx: Arc<watch::Sender<Progress>>,
}

impl Default for CompletionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionTracker {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Progress::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn issue(&self) {
        self.tx.send_modify(|progress| {
            progress.issued = progress.issued.saturating_add(1);
        });
    }

    pub fn complete(&self) -> Progress {
        self.tx.send_modify(|progress| {
            progress.completed = progress.completed.saturating_add(1);
        });
        self.progress()
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        *self.tx.borrow()
    }

    /// Resolves once at least `target` completions have been recorded.
    ///
    /// Returns `false` only if the tracker was torn down first.
    pub async fn wait_for_completed(&self, target: u64) -> bool {
        let mut rx = self.tx.subscribe();
        rx.wait_for(|progress| progress.completed >= target)
            .await
            .is_ok()
    }
}
