use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Run aborted on network error: {message}")]
    AbortedOnNetworkError { message: String },
}
