use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("URL is required!")]
    MissingUrl,
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported URL scheme '{scheme}' in '{url}'. Use http or https.")]
    UnsupportedScheme { url: String, scheme: String },
    #[error("URL '{url}' has no host.")]
    MissingHost { url: String },
    #[error("Invalid number: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid param '{value}'. Expected 'key:value'.")]
    InvalidParam { value: String },
    #[error("Invalid param '{value}'. Key must not be empty.")]
    EmptyParamKey { value: String },
    #[error("Invalid HTTP method '{value}'. Use GET, POST, PUT, HEAD, DELETE, or OPTIONS.")]
    InvalidMethod { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
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
