use tracing_subscriber::{EnvFilter, FmtSubscriber};

const LOG_ENV: &str = "STAMPEDE_LOG";
const FALLBACK_LOG_ENV: &str = "RUST_LOG";

/// Installs the global tracing subscriber, writing to stderr so stdout
/// carries only the banner, echo output, and summary.
///
/// `STAMPEDE_LOG` wins over `RUST_LOG`; without either, `--verbose` selects
/// `debug` and the default is `info`.
pub fn init_logging(verbose: bool) {
    let directive = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var(FALLBACK_LOG_ENV))
        .ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(build_filter(directive.as_deref(), verbose))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

fn build_filter(directive: Option<&str>, verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "info" };
    directive.map_or_else(
        || EnvFilter::new(default_level),
        |value| EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new("info")),
    )
}
