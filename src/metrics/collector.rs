use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};

use crate::fail_fast::FailFastReceiver;
use crate::shutdown::ShutdownSender;
use crate::sinks::OutcomeSink;

use super::{
    CollectorReport, FailureSignal, LatencyHistogram, LatencySummary, Outcome, StatusHistogram,
    Termination, WorkerEvent,
};

#[derive(Clone, Copy, Debug)]
pub struct CollectorConfig {
    pub total_requests: u64,
    pub quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AggregatorState {
    Running,
    Done,
    Aborted,
    Interrupted,
    /// Every worker exited before the total was accounted for.
    Starved,
}

/// Single owner of every piece of aggregated run state.
pub(crate) struct Aggregator {
    config: CollectorConfig,
    sink: Box<dyn OutcomeSink>,
    state: AggregatorState,
    completed: u64,
    skipped: u64,
    histogram: StatusHistogram,
    latency: Option<LatencyHistogram>,
    latency_sum_ms: u128,
    min_latency_ms: u64,
    max_latency_ms: u64,
    failure: Option<FailureSignal>,
}

impl Aggregator {
    pub(crate) fn new(config: CollectorConfig, sink: Box<dyn OutcomeSink>) -> Self {
        let latency = match LatencyHistogram::new() {
            Ok(histogram) => Some(histogram),
            Err(err) => {
                warn!("Failed to initialize latency histogram: {}", err);
                None
            }
        };
        let state = if config.total_requests == 0 {
            AggregatorState::Done
        } else {
            AggregatorState::Running
        };
        Self {
            config,
            sink,
            state,
            completed: 0,
            skipped: 0,
            histogram: StatusHistogram::new(),
            latency,
            latency_sum_ms: 0,
            min_latency_ms: u64::MAX,
            max_latency_ms: 0,
            failure: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> AggregatorState {
        self.state
    }

    pub(crate) fn is_running(&self) -> bool {
        self.state == AggregatorState::Running
    }

    #[cfg(test)]
    pub(crate) fn completed(&self) -> u64 {
        self.completed
    }

    #[cfg(test)]
    pub(crate) fn histogram(&self) -> &StatusHistogram {
        &self.histogram
    }

    pub(crate) fn record(&mut self, event: WorkerEvent) -> AggregatorState {
        if !self.is_running() {
            return self.state;
        }
        match event {
            WorkerEvent::Completed(outcome) => self.record_outcome(&outcome),
            WorkerEvent::Skipped { sequence, worker } => {
                debug!("Request #{} skipped by worker {}", sequence, worker);
                self.skipped = self.skipped.saturating_add(1);
            }
        }
        if self.completed.saturating_add(self.skipped) >= self.config.total_requests {
            self.state = AggregatorState::Done;
        }
        self.state
    }

    fn record_outcome(&mut self, outcome: &Outcome) {
        self.histogram.record(outcome.status_code);
        self.completed = self.completed.saturating_add(1);

        let latency_ms = u64::try_from(outcome.latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_sum_ms = self.latency_sum_ms.saturating_add(u128::from(latency_ms));
        self.min_latency_ms = self.min_latency_ms.min(latency_ms);
        self.max_latency_ms = self.max_latency_ms.max(latency_ms);
        if let Some(histogram) = self.latency.as_mut()
            && let Err(err) = histogram.record(latency_ms)
        {
            warn!("{}", err);
        }

        if !self.config.quiet {
            self.sink.record(outcome);
        }
    }

    /// First signal wins; anything after a terminal state is ignored.
    pub(crate) fn abort(&mut self, signal: FailureSignal) -> AggregatorState {
        if self.is_running() {
            self.failure = Some(signal);
            self.state = AggregatorState::Aborted;
        }
        self.state
    }

    pub(crate) fn interrupt(&mut self) -> AggregatorState {
        if self.is_running() {
            self.state = AggregatorState::Interrupted;
        }
        self.state
    }

    /// Every worker exited and the outcome channel is empty.
    pub(crate) fn finish_drained(&mut self) -> AggregatorState {
        if self.is_running() {
            warn!(
                "All workers exited after {} of {} requests.",
                self.completed.saturating_add(self.skipped),
                self.config.total_requests
            );
            self.state = AggregatorState::Starved;
        }
        self.state
    }

    fn latency_summary(&self) -> LatencySummary {
        if self.completed == 0 {
            return LatencySummary::default();
        }
        let avg_ms = self
            .latency_sum_ms
            .checked_div(u128::from(self.completed))
            .and_then(|avg| u64::try_from(avg).ok())
            .unwrap_or(u64::MAX);
        let (p50_ms, p90_ms, p99_ms) = self
            .latency
            .as_ref()
            .map_or((0, 0, 0), LatencyHistogram::percentiles);
        LatencySummary {
            min_ms: self.min_latency_ms,
            avg_ms,
            max_ms: self.max_latency_ms,
            p50_ms,
            p90_ms,
            p99_ms,
        }
    }

    pub(crate) fn into_report(mut self) -> CollectorReport {
        self.sink.flush();
        let latency = self.latency_summary();
        let termination = match self.state {
            AggregatorState::Done => Termination::Completed,
            AggregatorState::Running | AggregatorState::Starved => Termination::Incomplete,
            AggregatorState::Aborted => Termination::Aborted,
            AggregatorState::Interrupted => Termination::Interrupted,
        };
        CollectorReport {
            termination,
            completed: self.completed,
            skipped: self.skipped,
            histogram: self.histogram,
            latency,
            failure: self.failure,
        }
    }
}

/// Spawns the collector that consumes worker events until the run ends.
///
/// Fail-fast signals take priority over outcomes that arrive at the same
/// time, then external shutdown, then outcomes.
#[must_use]
pub fn setup_outcome_collector(
    config: CollectorConfig,
    shutdown_tx: &ShutdownSender,
    mut events_rx: mpsc::Receiver<WorkerEvent>,
    mut failure_rx: FailFastReceiver,
    sink: Box<dyn OutcomeSink>,
) -> JoinHandle<CollectorReport> {
    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::spawn(async move {
        let mut aggregator = Aggregator::new(config, sink);
        let mut failure_open = true;
        let mut shutdown_open = true;

        while aggregator.is_running() {
            tokio::select! {
                biased;
                maybe_failure = failure_rx.recv(), if failure_open => match maybe_failure {
                    Some(signal) => {
                        aggregator.abort(signal);
                    }
                    None => failure_open = false,
                },
                result = shutdown_rx.recv(), if shutdown_open => match result {
                    Ok(()) | Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {
                        aggregator.interrupt();
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => shutdown_open = false,
                },
                maybe_event = events_rx.recv() => match maybe_event {
                    Some(event) => {
                        aggregator.record(event);
                    }
                    None => {
                        aggregator.finish_drained();
                    }
                },
            }
        }

        aggregator.into_report()
    })
}
