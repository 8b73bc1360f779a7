use std::io::Write;
use std::sync::Arc;

use tokio::{
    sync::{Mutex, mpsc},
    task::JoinHandle,
    time::Instant,
};
use tracing::{debug, error, warn};

use crate::{
    args::PositiveUsize,
    error::AppResult,
    metrics::{FailureReason, ResultRecord},
    shutdown::{ShutdownReceiver, ShutdownSender},
};

use super::{
    dispatch::DispatchSignal,
    request::RequestSpec,
    transport::{Exchange, Transport},
};

const SUCCESS_STATUS: u16 = 200;

/// State every worker reads; never mutated during a run.
pub struct WorkerShared {
    transport: Arc<dyn Transport>,
    spec: RequestSpec,
    abort_on_error: bool,
}

impl WorkerShared {
    #[must_use]
    pub const fn new(transport: Arc<dyn Transport>, spec: RequestSpec, abort_on_error: bool) -> Self {
        Self {
            transport,
            spec,
            abort_on_error,
        }
    }
}

/// Fixed set of workers sharing one intake queue and one record channel.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `size` workers.
    ///
    /// Each worker loops: take a signal, run the request, emit one record.
    /// A worker stops when the intake queue is closed and empty, when the
    /// record channel is gone, or on shutdown. A request already in flight
    /// always finishes and reports before the worker stops.
    #[must_use]
    pub fn spawn(
        size: PositiveUsize,
        shared: WorkerShared,
        intake_rx: mpsc::Receiver<DispatchSignal>,
        records_tx: mpsc::Sender<ResultRecord>,
        shutdown_tx: &ShutdownSender,
    ) -> Self {
        let shared = Arc::new(shared);
        let intake_rx = Arc::new(Mutex::new(intake_rx));
        let mut handles = Vec::with_capacity(size.get());

        for worker_id in 0..size.get() {
            let shared = Arc::clone(&shared);
            let intake_rx = Arc::clone(&intake_rx);
            let records_tx = records_tx.clone();
            let shutdown_tx = shutdown_tx.clone();
            let shutdown_rx = shutdown_tx.subscribe();
            handles.push(tokio::spawn(async move {
                run_worker(
                    worker_id,
                    &shared,
                    &intake_rx,
                    &records_tx,
                    &shutdown_tx,
                    shutdown_rx,
                )
                .await;
            }));
        }
        drop(records_tx);

        Self { handles }
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.handles.len()
    }

    /// Waits for every worker to stop.
    ///
    /// # Errors
    ///
    /// Returns an error if a worker task panicked.
    pub async fn join(self) -> AppResult<()> {
        for handle in self.handles {
            handle.await?;
        }
        Ok(())
    }
}

async fn run_worker(
    worker_id: usize,
    shared: &WorkerShared,
    intake_rx: &Mutex<mpsc::Receiver<DispatchSignal>>,
    records_tx: &mpsc::Sender<ResultRecord>,
    shutdown_tx: &ShutdownSender,
    mut shutdown_rx: ShutdownReceiver,
) {
    loop {
        let signal = tokio::select! {
            biased;
            _ = shutdown_rx.recv() => break,
            signal = next_signal(intake_rx) => signal,
        };
        if signal.is_none() {
            break;
        }

        let record = execute_once(shared.transport.as_ref(), &shared.spec).await;
        let abort = shared.abort_on_error && record.is_network_failure();
        if records_tx.send(record).await.is_err() {
            break;
        }
        if abort {
            drop(shutdown_tx.send(()));
            break;
        }
    }
    debug!("Worker {} stopped", worker_id);
}

async fn next_signal(intake_rx: &Mutex<mpsc::Receiver<DispatchSignal>>) -> Option<DispatchSignal> {
    intake_rx.lock().await.recv().await
}

/// Writes the status line and body as one block so concurrent workers
/// cannot interleave inside a single response.
pub(super) fn write_echo<W: Write>(out: &mut W, exchange: &Exchange) -> std::io::Result<()> {
    let block = format!(
        "{}\n{}\n",
        exchange.status_line,
        exchange.body.as_deref().unwrap_or_default()
    );
    out.write_all(block.as_bytes())?;
    out.flush()
}

/// Runs one request and classifies it.
///
/// Latency covers the whole transport call, success or not. With echo on,
/// the status line and body are printed for every response that carried a
/// status; this does not change the recorded latency.
pub async fn execute_once(transport: &dyn Transport, spec: &RequestSpec) -> ResultRecord {
    let start = Instant::now();
    let result = transport.execute(spec).await;
    let latency = start.elapsed();

    match result {
        Ok(exchange) => {
            if spec.echo() {
                let echoed = write_echo(&mut std::io::stdout().lock(), &exchange);
                if let Err(err) = echoed {
                    warn!("Failed to echo response: {}", err);
                }
            }
            if exchange.status == SUCCESS_STATUS {
                ResultRecord::success(latency)
            } else {
                ResultRecord::Failure(FailureReason::NonOkStatus {
                    status: exchange.status,
                })
            }
        }
        Err(err) => {
            error!("{}", err);
            ResultRecord::Failure(FailureReason::Network {
                message: err.to_string(),
            })
        }
    }
}
