//! Destinations for the per-outcome record stream.
mod jsonl;
mod log;

#[cfg(test)]
mod tests;

use crate::metrics::Outcome;

pub use jsonl::JsonLinesSink;
pub use log::LogSink;

/// Receives every recorded outcome, in collector order, unless the run is quiet.
pub trait OutcomeSink: Send {
    fn record(&mut self, outcome: &Outcome);

    fn flush(&mut self) {}
}

/// Forwards each outcome to several sinks.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn OutcomeSink>>,
}

impl FanoutSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, sink: Box<dyn OutcomeSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl OutcomeSink for FanoutSink {
    fn record(&mut self, outcome: &Outcome) {
        for sink in &mut self.sinks {
            sink.record(outcome);
        }
    }

    fn flush(&mut self) {
        for sink in &mut self.sinks {
            sink.flush();
        }
    }
}
