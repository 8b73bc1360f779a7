use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveU64, TesterArgs, parse_params};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments.
///
/// Values given on the command line always win over the config file.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut TesterArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = PositiveU64::try_from(requests).map_err(|err| invalid("requests", err))?;
    }

    if !is_cli(matches, "rps")
        && let Some(rps) = config.rps
    {
        args.rps = rps;
    }

    if !is_cli(matches, "workers")
        && let Some(workers) = config.workers
    {
        args.workers = workers;
    }

    if !is_cli(matches, "method")
        && let Some(method) = config.method
    {
        args.method = method;
    }

    if !is_cli(matches, "params")
        && let Some(params) = config.params.as_deref()
    {
        args.params = Some(parse_params(params).map_err(|err| invalid("params", err))?);
    }

    if !is_cli(matches, "fout")
        && let Some(fout) = config.fout.clone()
    {
        args.fout = Some(fout);
    }

    if !is_cli(matches, "echo")
        && let Some(echo) = config.echo
    {
        args.echo = echo;
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = timeout.to_duration()?;
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = timeout.to_duration()?;
    }

    if !is_cli(matches, "abort_on_error")
        && let Some(abort) = config.abort_on_error
    {
        args.abort_on_error = abort;
    }

    if !is_cli(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn invalid(field: &'static str, source: ValidationError) -> AppError {
    AppError::config(ConfigError::InvalidField { field, source })
}
