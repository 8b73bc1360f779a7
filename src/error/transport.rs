use thiserror::Error;

/// Failure reaching the target or reading its response.
///
/// Every variant is a network-class failure: the request produced no usable
/// HTTP status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request timed out: {message}")]
    Timeout { message: String },
    #[error("Request failed: {message}")]
    Connect { message: String },
    #[error("Failed to read response body: {message}")]
    Body { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            TransportError::Timeout { message }
        } else if err.is_body() || err.is_decode() {
            TransportError::Body { message }
        } else {
            TransportError::Connect { message }
        }
    }
}
