use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to create latency log '{path}': {source}")]
    CreateLatencyLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write latency log '{path}': {source}")]
    WriteLatencyLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to format latency log line: {source}")]
    FormatLine {
        #[source]
        source: std::fmt::Error,
    },
}
