use tokio::{sync::mpsc, task::JoinHandle};
use tracing::debug;

use crate::{
    args::PositiveU64,
    metrics::CompletionTracker,
    shutdown::{ShutdownReceiver, ShutdownSender},
};

use super::rate::RateLimiter;

/// "Send one more request now." Carries nothing but its own existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSignal;

/// Spawns the dispatch loop: exactly `total` signals into the intake queue,
/// paced by `rps` (0 = unthrottled).
///
/// Each signal waits for a free intake slot before it is counted, so a full
/// queue throttles dispatch to worker throughput. The loop stops early on
/// shutdown. The intake sender is dropped on exit, which lets idle workers
/// drain and stop. Resolves to the number of signals issued.
#[must_use]
pub fn spawn_dispatcher(
    total: PositiveU64,
    rps: u64,
    intake_tx: mpsc::Sender<DispatchSignal>,
    tracker: CompletionTracker,
    shutdown_tx: &ShutdownSender,
) -> JoinHandle<u64> {
    let shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        let limiter = RateLimiter::new(rps);
        dispatch(total, limiter, intake_tx, &tracker, shutdown_rx).await
    })
}

pub(super) async fn dispatch(
    total: PositiveU64,
    mut limiter: RateLimiter,
    intake_tx: mpsc::Sender<DispatchSignal>,
    tracker: &CompletionTracker,
    mut shutdown_rx: ShutdownReceiver,
) -> u64 {
    let mut issued: u64 = 0;
    while issued < total.get() {
        if issued > 0 && limiter.is_throttled() {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                () = limiter.wait() => {}
            }
        }

        let permit = tokio::select! {
            biased;
            _ = shutdown_rx.recv() => break,
            permit = intake_tx.reserve() => permit,
        };
        let Ok(permit) = permit else {
            debug!("Intake queue closed after {} requests", issued);
            break;
        };
        tracker.issue();
        permit.send(DispatchSignal);
        issued = issued.saturating_add(1);
    }

    drop(intake_tx);
    debug!("Dispatcher issued {}/{} requests", issued, total.get());
    issued
}
