use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use tracing::debug;

use crate::{
    args::DEFAULT_USER_AGENT,
    error::{AppError, AppResult, HttpError, TransportError},
};

use super::request::{FORM_CONTENT_TYPE, RequestSpec};

/// One completed HTTP exchange. The body has already been consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub status: u16,
    /// e.g. `200 OK`
    pub status_line: String,
    /// Decoded body, only captured when echo is on.
    pub body: Option<String>,
}

/// Boundary for performing one request/response exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `spec` once and reads the whole response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no HTTP status could be obtained or
    /// the body could not be read.
    async fn execute(&self, spec: &RequestSpec) -> Result<Exchange, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds the shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error when the client cannot be constructed.
    pub fn new(request_timeout: Duration, connect_timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, spec: &RequestSpec) -> Result<Exchange, TransportError> {
        let mut request = self
            .client
            .request(spec.method().to_reqwest(), spec.url().clone());
        if let Some(body) = spec.form_body() {
            request = request.header(CONTENT_TYPE, FORM_CONTENT_TYPE).body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let status_line = format_status_line(status);

        let body = if spec.echo() {
            Some(response.text().await?)
        } else {
            let drained = drain_response_body(response).await?;
            debug!("Discarded {} response body bytes", drained);
            None
        };

        Ok(Exchange {
            status: status.as_u16(),
            status_line,
            body,
        })
    }
}

fn format_status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
