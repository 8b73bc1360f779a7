use std::future::Future;

use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::shutdown::ShutdownSender;

/// Exit status used when a second stop signal cuts the drain short.
const FORCED_EXIT_CODE: i32 = 130;

/// Background task that turns stop signals into shutdown.
///
/// The first Ctrl+C (or SIGTERM on unix) broadcasts shutdown so in-flight
/// requests can finish and report. A second one exits the process at once.
/// The task runs until [`SignalShutdownHandler::stop`] is called.
#[derive(Debug)]
pub struct SignalShutdownHandler {
    handle: JoinHandle<()>,
}

impl SignalShutdownHandler {
    /// Stops listening for signals and waits for the task to end.
    pub async fn stop(self) {
        self.handle.abort();
        drop(self.handle.await);
    }
}

#[must_use]
pub fn setup_signal_shutdown_handler(shutdown_tx: &ShutdownSender) -> SignalShutdownHandler {
    let shutdown_tx = shutdown_tx.clone();
    let handle = tokio::spawn(watch_signals(shutdown_tx, next_stop_signal, force_exit));
    SignalShutdownHandler { handle }
}

async fn watch_signals<S, Fut, X>(shutdown_tx: ShutdownSender, mut next_signal: S, on_repeat: X)
where
    S: FnMut() -> Fut,
    Fut: Future<Output = &'static str>,
    X: FnOnce(&'static str),
{
    let first = next_signal().await;
    warn!(
        "Received {}; finishing in-flight requests. Send it again to exit immediately.",
        first
    );
    drop(shutdown_tx.send(()));

    let second = next_signal().await;
    on_repeat(second);
}

fn force_exit(name: &'static str) {
    error!("Received {} again; exiting without a summary.", name);
    std::process::exit(FORCED_EXIT_CODE);
}

/// Resolves with the name of the next stop signal delivered.
///
/// A signal source that cannot be registered never resolves.
async fn next_stop_signal() -> &'static str {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = interrupt => "Ctrl+C",
        () = terminate() => "SIGTERM",
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            term.recv().await;
        }
        Err(err) => {
            warn!("Failed to register SIGTERM handler: {}", err);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
