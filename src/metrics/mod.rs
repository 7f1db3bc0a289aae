//! Outcome records, status/latency histograms, and the single-owner collector.
mod collector;
mod histogram;
mod types;


pub use collector::{CollectorConfig, setup_outcome_collector};
pub use histogram::{LatencyHistogram, StatusHistogram};
pub use types::{
    CollectorReport, FailureKind, FailureSignal, LatencySummary, NO_RESPONSE_STATUS, Outcome,
    SUCCESS_STATUS, Termination, WorkerEvent,
};

#[cfg(test)]
pub(crate) use collector::{Aggregator, AggregatorState};
