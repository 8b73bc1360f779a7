use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::args::HttpMethod;
use crate::error::TransportError;

use super::{Exchange, RequestSpec, Transport};

/// What the scripted transport answers for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Scripted {
    Status(u16),
    NetworkError,
}

/// In-memory transport that cycles through a fixed script.
pub(crate) struct ScriptedTransport {
    script: Vec<Scripted>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub(crate) fn new(script: Vec<Scripted>, delay: Duration) -> Self {
        Self {
            script,
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn always(step: Scripted, delay: Duration) -> Self {
        Self::new(vec![step], delay)
    }

    pub(crate) fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, _spec: &RequestSpec) -> Result<Exchange, TransportError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let step = call.checked_rem(self.script.len()).unwrap_or(0);
        match self.script.get(step) {
            Some(Scripted::Status(status)) => Ok(Exchange {
                status: *status,
                status_line: status.to_string(),
                body: None,
            }),
            Some(Scripted::NetworkError) | None => Err(TransportError::Connect {
                message: "connection refused".to_owned(),
            }),
        }
    }
}

pub(crate) fn spec_for(url: &str) -> Result<RequestSpec, String> {
    RequestSpec::new(url, HttpMethod::Get, None, false)
        .map_err(|err| format!("Failed to build spec: {}", err))
}
