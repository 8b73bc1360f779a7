//! Run orchestration and console output.
mod runner;
mod summary;


use std::sync::Arc;

use tracing::warn;

use crate::{
    args::TesterArgs,
    error::{AppError, AppResult},
    http::{ReqwestTransport, RequestSpec},
    shutdown::shutdown_channel,
    shutdown_handlers::setup_signal_shutdown_handler,
};

pub use runner::{RunOutcome, RunSettings, execute_run};
pub use summary::{banner, print_summary};

/// Runs a load test for an already validated `spec` and prints the result.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be built, when the run
/// aborts on a network error, or when the latency log fails.
pub async fn run_local(args: &TesterArgs, spec: RequestSpec) -> AppResult<()> {
    let settings = RunSettings::from_args(args)?;
    let transport = Arc::new(ReqwestTransport::new(
        args.request_timeout,
        args.connect_timeout,
    )?);

    let (shutdown_tx, _) = shutdown_channel();
    let signal_handler = setup_signal_shutdown_handler(&shutdown_tx);

    println!("{}", banner(spec.url().as_str(), &settings));
    println!();

    let result = execute_run(&settings, spec, transport, &shutdown_tx).await;
    signal_handler.stop().await;

    let outcome = result?;
    if outcome.cancelled {
        warn!(
            "Run stopped early: {} of {} requests completed.",
            outcome.summary.total_requests,
            settings.total.get()
        );
    }
    print_summary(&outcome.summary);

    outcome
        .log_error
        .map_or(Ok(()), |err| Err(AppError::sink(err)))
}
