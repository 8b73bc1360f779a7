use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tokio::{fs::File, io::AsyncWriteExt};

use crate::error::SinkError;

const LOG_BUFFER_FLUSH_BYTES: usize = 64 * 1024;
const NANOS_PER_MILLI: u64 = 1_000_000;

/// Per-request latency log: one `sequence,latency_ms` line per success.
///
/// The file is truncated on creation. There is no header and no trailing
/// summary line. Lines collect in one in-memory buffer that is written to
/// the file whenever it passes 64 KiB and once more on [`LatencyLog::finish`].
#[derive(Debug)]
pub struct LatencyLog {
    path: PathBuf,
    file: File,
    buffer: String,
}

impl LatencyLog {
    /// Creates (or truncates) the log file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be created.
    pub async fn create(path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path)
            .await
            .map_err(|err| SinkError::CreateLatencyLog {
                path: path.to_path_buf(),
                source: err,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            buffer: String::with_capacity(LOG_BUFFER_FLUSH_BYTES),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line; milliseconds are truncated.
    ///
    /// # Errors
    ///
    /// Returns an error when the buffered line cannot be written out.
    pub async fn append(&mut self, sequence: u64, latency_nanos: u64) -> Result<(), SinkError> {
        let latency_ms = latency_nanos / NANOS_PER_MILLI;
        writeln!(&mut self.buffer, "{},{}", sequence, latency_ms)
            .map_err(|err| SinkError::FormatLine { source: err })?;
        if self.buffer.len() >= LOG_BUFFER_FLUSH_BYTES {
            self.write_buffer().await?;
        }
        Ok(())
    }

    /// Writes any buffered lines and flushes the file.
    ///
    /// # Errors
    ///
    /// Returns an error when the final write or flush fails.
    pub async fn finish(mut self) -> Result<(), SinkError> {
        self.write_buffer().await?;
        self.file
            .flush()
            .await
            .map_err(|err| SinkError::WriteLatencyLog {
                path: self.path.clone(),
                source: err,
            })
    }

    async fn write_buffer(&mut self) -> Result<(), SinkError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        self.file
            .write_all(self.buffer.as_bytes())
            .await
            .map_err(|err| SinkError::WriteLatencyLog {
                path: self.path.clone(),
                source: err,
            })?;
        self.buffer.clear();
        Ok(())
    }
}
