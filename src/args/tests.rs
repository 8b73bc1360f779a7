use super::*;
use crate::error::{AppError, AppResult};
use clap::Parser;
use std::time::Duration;

fn parse<const N: usize>(argv: [&str; N]) -> AppResult<TesterArgs> {
    TesterArgs::try_parse_from(argv).map_err(AppError::from)
}

#[test]
fn parse_args_defaults() -> AppResult<()> {
    let args = parse(["stampede", "-u", "http://localhost"])?;
    if args.requests.get() != 50 {
        return Err(AppError::validation("Expected 50 requests by default"));
    }
    if args.rps != 0 || args.workers != 0 {
        return Err(AppError::validation("Expected unthrottled, auto workers"));
    }
    if args.method != HttpMethod::Get {
        return Err(AppError::validation("Expected GET by default"));
    }
    if args.params.is_some() || args.fout.is_some() || args.echo || args.abort_on_error {
        return Err(AppError::validation("Unexpected optional flag set"));
    }
    if args.request_timeout != Duration::from_secs(10) {
        return Err(AppError::validation("Unexpected default timeout"));
    }
    Ok(())
}

#[test]
fn parse_args_without_url_is_accepted() -> AppResult<()> {
    let args = parse(["stampede"])?;
    if args.url.is_some() {
        return Err(AppError::validation("Expected no url"));
    }
    Ok(())
}

#[test]
fn parse_args_method_is_case_insensitive() -> AppResult<()> {
    for (raw, expected) in [
        ("post", HttpMethod::Post),
        ("PUT", HttpMethod::Put),
        ("Head", HttpMethod::Head),
        ("options", HttpMethod::Options),
        ("DELETE", HttpMethod::Delete),
    ] {
        let args = parse(["stampede", "-u", "http://localhost", "--method", raw])?;
        if args.method != expected {
            return Err(AppError::validation(format!(
                "Expected {} for '{}', got {}",
                expected, raw, args.method
            )));
        }
    }
    Ok(())
}

#[test]
fn parse_args_rejects_unknown_method() -> AppResult<()> {
    if parse(["stampede", "-u", "http://localhost", "-X", "patch"]).is_ok() {
        return Err(AppError::validation("Expected PATCH to be rejected"));
    }
    Ok(())
}

#[test]
fn parse_args_rejects_zero_requests() -> AppResult<()> {
    if parse(["stampede", "-u", "http://localhost", "--requests", "0"]).is_ok() {
        return Err(AppError::validation("Expected zero requests to be rejected"));
    }
    Ok(())
}

#[test]
fn parse_args_rejects_negative_rps() -> AppResult<()> {
    if parse(["stampede", "-u", "http://localhost", "--rps", "-5"]).is_ok() {
        return Err(AppError::validation("Expected negative rps to be rejected"));
    }
    Ok(())
}

#[test]
fn parse_args_full_surface() -> AppResult<()> {
    let args = parse([
        "stampede",
        "--url",
        "https://example.com/api",
        "--requests",
        "10",
        "--rps",
        "5",
        "--workers",
        "2",
        "--method",
        "post",
        "--params",
        "a:1,b:2",
        "--fout",
        "latency.csv",
        "--echo",
        "--timeout",
        "250ms",
        "--abort-on-error",
    ])?;
    if args.requests.get() != 10 || args.rps != 5 || args.workers != 2 {
        return Err(AppError::validation("Unexpected counts"));
    }
    let params = args
        .params
        .ok_or_else(|| AppError::validation("Expected params"))?;
    if params.encode() != "a=1&b=2" {
        return Err(AppError::validation(format!(
            "Unexpected params encoding: {}",
            params.encode()
        )));
    }
    if args.fout.as_deref() != Some(std::path::Path::new("latency.csv")) {
        return Err(AppError::validation("Unexpected fout"));
    }
    if !args.echo || !args.abort_on_error {
        return Err(AppError::validation("Expected echo and abort-on-error"));
    }
    if args.request_timeout != Duration::from_millis(250) {
        return Err(AppError::validation("Unexpected timeout"));
    }
    Ok(())
}

#[test]
fn parse_params_splits_on_first_colon() -> AppResult<()> {
    let params = parse_params("redirect:http://x, note:hello world")?;
    let expected = vec![
        ("redirect".to_owned(), "http://x".to_owned()),
        ("note".to_owned(), "hello world".to_owned()),
    ];
    if params.pairs() != expected.as_slice() {
        return Err(AppError::validation(format!(
            "Unexpected pairs: {:?}",
            params.pairs()
        )));
    }
    if params.encode() != "redirect=http%3A%2F%2Fx&note=hello+world" {
        return Err(AppError::validation(format!(
            "Unexpected encoding: {}",
            params.encode()
        )));
    }
    Ok(())
}

#[test]
fn parse_params_rejects_missing_separator() -> AppResult<()> {
    if parse_params("a:1,b").is_ok() {
        return Err(AppError::validation("Expected error for 'b'"));
    }
    if parse_params(":1").is_ok() {
        return Err(AppError::validation("Expected error for empty key"));
    }
    Ok(())
}

#[test]
fn parse_params_empty_is_empty() -> AppResult<()> {
    if !parse_params("")?.is_empty() {
        return Err(AppError::validation("Expected no params"));
    }
    Ok(())
}

#[test]
fn parse_duration_arg_units() -> AppResult<()> {
    for (raw, expected) in [
        ("1500ms", Duration::from_millis(1500)),
        ("3", Duration::from_secs(3)),
        ("2m", Duration::from_secs(120)),
        ("1h", Duration::from_secs(3600)),
    ] {
        let parsed = parse_duration_arg(raw)?;
        if parsed != expected {
            return Err(AppError::validation(format!(
                "Unexpected duration for {}: {:?}",
                raw, parsed
            )));
        }
    }
    if parse_duration_arg("0s").is_ok() || parse_duration_arg("5x").is_ok() {
        return Err(AppError::validation("Expected invalid durations to fail"));
    }
    Ok(())
}

#[test]
fn default_worker_count_is_positive() {
    let workers = default_worker_count();
    assert!(workers.get() >= 1);
}
