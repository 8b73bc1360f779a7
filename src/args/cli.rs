use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use super::parsers::{parse_duration_arg, parse_params, parse_positive_u64};
use super::types::{FormParams, HttpMethod, PositiveU64};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Async HTTP load generator - fixed worker pool, optional rate pacing, and best/worst/average latency reporting."
)]
pub struct TesterArgs {
    /// The url to stress. Must have http/https in the url (required)
    #[arg(long, short)]
    pub url: Option<String>,

    /// The total number of requests to send out
    #[arg(
        long,
        short = 'n',
        default_value = "50",
        value_parser = parse_positive_u64
    )]
    pub requests: PositiveU64,

    /// Requests per second. If set to 0, requests are sent as fast as the workers allow
    #[arg(long, short = 'r', default_value_t = 0)]
    pub rps: u64,

    /// Number of concurrent workers. 0 uses the number of CPUs
    #[arg(long, short = 'w', default_value_t = 0)]
    pub workers: usize,

    /// HTTP method: GET, POST, PUT, HEAD, DELETE, OPTIONS
    #[arg(long, short = 'X', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// Params in key:value form separated by commas, e.g. param1:20,param2:30 (POST only)
    #[arg(long, short = 'p', value_parser = parse_params)]
    pub params: Option<FormParams>,

    /// Write one 'request_number,latency_ms' line per successful request to this file
    #[arg(long, short = 'o')]
    pub fout: Option<PathBuf>,

    /// Print the status line and body of every response
    #[arg(long, short = 'e')]
    pub echo: bool,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        default_value = "10s",
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Timeout for establishing a new connection (supports ms/s/m/h)
    #[arg(
        long = "connect-timeout",
        default_value = "5s",
        value_parser = parse_duration_arg
    )]
    pub connect_timeout: Duration,

    /// Stop the whole run on the first network error instead of counting it
    #[arg(long = "abort-on-error")]
    pub abort_on_error: bool,

    /// Path to config file (TOML/JSON). Defaults to ./stampede.toml or ./stampede.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by STAMPEDE_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
