use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::args::{HttpMethod, parse_duration_arg};
use crate::error::{AppError, AppResult, ValidationError};

/// On-disk configuration. Keys mirror the long CLI flag names.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub requests: Option<u64>,
    pub rps: Option<u64>,
    pub workers: Option<usize>,
    pub method: Option<HttpMethod>,
    pub params: Option<String>,
    pub fout: Option<PathBuf>,
    pub echo: Option<bool>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub abort_on_error: Option<bool>,
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> AppResult<Duration> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(AppError::validation(ValidationError::DurationZero))
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration_arg(text),
        }
    }
}
