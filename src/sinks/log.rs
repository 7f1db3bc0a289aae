use tracing::{info, warn};

use crate::metrics::Outcome;

use super::OutcomeSink;

/// Logs each outcome through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl OutcomeSink for LogSink {
    fn record(&mut self, outcome: &Outcome) {
        let bytes = outcome
            .content_length
            .map_or_else(|| "unknown".to_owned(), |len| len.to_string());
        let latency_ms = outcome.latency.as_millis();
        match outcome.error.as_deref() {
            Some(error) => warn!(
                "#{} {} worker={} error=\"{}\" latency={}ms",
                outcome.sequence, outcome.method, outcome.worker, error, latency_ms
            ),
            None => info!(
                "#{} {} worker={} status={} bytes={} latency={}ms",
                outcome.sequence,
                outcome.method,
                outcome.worker,
                outcome.status_code,
                bytes,
                latency_ms
            ),
        }
    }
}
