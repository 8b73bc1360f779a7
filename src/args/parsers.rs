use std::time::Duration;

use super::types::{FormParams, PositiveU64};
use crate::error::{AppError, AppResult, ValidationError};

pub(super) fn parse_positive_u64(s: &str) -> AppResult<PositiveU64> {
    s.parse::<PositiveU64>().map_err(AppError::from)
}

/// Parses `key:value` pairs separated by commas, e.g. `a:1,b:2`.
///
/// Only the first `:` splits a pair, so values may contain colons. An empty
/// string yields no params.
pub(crate) fn parse_params(s: &str) -> Result<FormParams, ValidationError> {
    let mut pairs = Vec::new();
    for raw in s.split(',') {
        let entry = raw.trim();
        if entry.is_empty() {
            continue;
        }
        let (key, value) = entry
            .split_once(':')
            .ok_or_else(|| ValidationError::InvalidParam {
                value: entry.to_owned(),
            })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ValidationError::EmptyParamKey {
                value: entry.to_owned(),
            });
        }
        pairs.push((key.to_owned(), value.trim().to_owned()));
    }
    Ok(FormParams::new(pairs))
}

/// Millisecond multipliers for the accepted duration suffixes.
const DURATION_UNITS_MS: [(&str, u64); 4] = [
    ("ms", 1),
    ("s", 1_000),
    ("m", 60_000),
    ("h", 3_600_000),
];

/// Parses `<integer>[ms|s|m|h]`; a bare integer means seconds.
pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    let value = s.trim();
    if value.is_empty() {
        return Err(AppError::validation(ValidationError::DurationEmpty));
    }

    let split = value
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, suffix) = value
        .split_at_checked(split)
        .filter(|(digits, _)| !digits.is_empty())
        .ok_or_else(|| {
            AppError::validation(ValidationError::InvalidDurationFormat {
                value: value.to_owned(),
            })
        })?;

    let amount: u64 = digits.parse().map_err(|err| {
        AppError::validation(ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })
    })?;

    let unit = if suffix.is_empty() { "s" } else { suffix };
    let multiplier = DURATION_UNITS_MS
        .iter()
        .find_map(|(name, ms)| (*name == unit).then_some(*ms))
        .ok_or_else(|| {
            AppError::validation(ValidationError::InvalidDurationUnit {
                unit: unit.to_owned(),
            })
        })?;
    let millis = amount
        .checked_mul(multiplier)
        .ok_or_else(|| AppError::validation(ValidationError::DurationOverflow))?;

    if millis == 0 {
        return Err(AppError::validation(ValidationError::DurationZero));
    }
    Ok(Duration::from_millis(millis))
}
