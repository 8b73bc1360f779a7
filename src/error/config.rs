use std::path::PathBuf;

use thiserror::Error;

use super::ValidationError;

/// Problems with the optional config file. All surface before a run starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config file {} is not valid TOML: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Config file {} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Config file {} must end in .toml or .json.", path.display())]
    UnknownFormat { path: PathBuf },
    #[error("Config key '{field}' is invalid: {source}")]
    InvalidField {
        field: &'static str,
        #[source]
        source: ValidationError,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
