use std::ffi::OsString;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::TesterArgs;
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::RequestSpec;

/// Process entry: parse arguments, apply config, and run on a fresh runtime.
///
/// A missing or unusable URL prints usage and returns `Ok(())`.
///
/// # Errors
///
/// Returns an error for bad flags or config, and for any failure of the run.
pub fn run() -> AppResult<()> {
    let (args, matches) = parse_args(std::env::args_os())?;
    let args = apply_config(args, &matches)?;

    crate::logger::init_logging(args.verbose);

    let Some(spec) = resolve_spec(&args)? else {
        let mut cmd = TesterArgs::command();
        cmd.print_help()?;
        println!();
        return Ok(());
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(crate::app::run_local(&args, spec))
}

fn parse_args<I>(raw_args: I) -> AppResult<(TesterArgs, ArgMatches)>
where
    I: IntoIterator<Item = OsString>,
{
    let matches = TesterArgs::command().get_matches_from(raw_args);
    let args = TesterArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

fn apply_config(mut args: TesterArgs, matches: &ArgMatches) -> AppResult<TesterArgs> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(&mut args, matches, &config)?;
    }
    Ok(args)
}

/// `Ok(None)` means "show usage": the URL is absent or not a usable target.
fn resolve_spec(args: &TesterArgs) -> AppResult<Option<RequestSpec>> {
    let Some(url) = args.url.as_deref() else {
        println!("{}", ValidationError::MissingUrl);
        return Ok(None);
    };
    let spec = RequestSpec::new(url, args.method, args.params.clone(), args.echo).map_or_else(
        |err| {
            println!("{}", AppError::validation(err));
            None
        },
        Some,
    );
    Ok(spec)
}
