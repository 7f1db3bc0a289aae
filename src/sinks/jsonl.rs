use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::warn;

use crate::error::MetricsError;
use crate::metrics::Outcome;

use super::OutcomeSink;

#[derive(Serialize)]
struct OutcomeRecord<'a> {
    timestamp: String,
    sequence: u64,
    worker: usize,
    method: &'static str,
    status_code: u16,
    content_length: Option<u64>,
    succeeded: bool,
    error: Option<&'a str>,
    latency_ms: u64,
}

impl<'a> From<&'a Outcome> for OutcomeRecord<'a> {
    fn from(outcome: &'a Outcome) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            sequence: outcome.sequence,
            worker: outcome.worker,
            method: outcome.method.as_str(),
            status_code: outcome.status_code,
            content_length: outcome.content_length,
            succeeded: outcome.succeeded,
            error: outcome.error.as_deref(),
            latency_ms: u64::try_from(outcome.latency.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Writes one JSON object per outcome.
///
/// The first write failure is logged and the sink goes silent.
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
    failed: bool,
}

impl JsonLinesSink<BufWriter<File>> {
    /// Creates (or truncates) `path` for writing.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be created.
    pub fn create(path: &Path) -> Result<Self, MetricsError> {
        let file = File::create(path).map_err(|err| MetricsError::OpenOutcomeLog {
            path: path.to_path_buf(),
            source: err,
        })?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            failed: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.writer
    }

    fn write_record(&mut self, outcome: &Outcome) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, &OutcomeRecord::from(outcome))?;
        self.writer.write_all(b"\n")
    }
}

impl<W: Write + Send> OutcomeSink for JsonLinesSink<W> {
    fn record(&mut self, outcome: &Outcome) {
        if self.failed {
            return;
        }
        if let Err(err) = self.write_record(outcome) {
            warn!("Failed to write outcome record: {}", err);
            self.failed = true;
        }
    }

    fn flush(&mut self) {
        if self.failed {
            return;
        }
        if let Err(err) = self.writer.flush() {
            warn!("Failed to flush outcome records: {}", err);
            self.failed = true;
        }
    }
}
