use std::time::Duration;

use crate::args::HttpMethod;
use crate::error::RequestError;
use crate::http::{RequestSpec, Response};

/// The only status counted as a success.
pub const SUCCESS_STATUS: u16 = 200;
/// Histogram bucket for attempts that never produced a response.
pub const NO_RESPONSE_STATUS: u16 = 0;

/// Result of one executed request attempt.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub sequence: u64,
    pub worker: usize,
    pub method: HttpMethod,
    pub status_code: u16,
    pub content_length: Option<u64>,
    pub succeeded: bool,
    pub error: Option<String>,
    pub latency: Duration,
}

impl Outcome {
    #[must_use]
    pub fn from_response(
        spec: &RequestSpec,
        worker: usize,
        response: Response,
        latency: Duration,
    ) -> Self {
        Self {
            sequence: spec.sequence,
            worker,
            method: spec.method,
            status_code: response.status_code,
            content_length: response.content_length,
            succeeded: response.status_code == SUCCESS_STATUS,
            error: None,
            latency,
        }
    }

    #[must_use]
    pub fn from_error(
        spec: &RequestSpec,
        worker: usize,
        error: &RequestError,
        latency: Duration,
    ) -> Self {
        Self {
            sequence: spec.sequence,
            worker,
            method: spec.method,
            status_code: NO_RESPONSE_STATUS,
            content_length: None,
            succeeded: false,
            error: Some(error.to_string()),
            latency,
        }
    }
}

/// Why a fail-fast run was aborted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    NonSuccessStatus,
    Transport,
    Construction,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FailureKind::NonSuccessStatus => "non-success-status",
            FailureKind::Transport => "transport",
            FailureKind::Construction => "construction",
        }
    }
}

/// The first failing outcome observed under fail-fast mode.
#[derive(Clone, Debug)]
pub struct FailureSignal {
    pub kind: FailureKind,
    pub outcome: Outcome,
}

/// Message a worker hands to the collector for every request it picked up.
#[derive(Clone, Debug)]
pub enum WorkerEvent {
    Completed(Outcome),
    /// The request could not be built and fail-fast is off.
    Skipped { sequence: u64, worker: usize },
}

/// Final state of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Every requested attempt was accounted for.
    Completed,
    /// A fail-fast signal ended the run.
    Aborted,
    /// An external shutdown (Ctrl+C, SIGTERM) ended the run.
    Interrupted,
    /// The workers were gone before every request was accounted for.
    Incomplete,
}

impl Termination {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Termination::Completed => "completed",
            Termination::Aborted => "aborted",
            Termination::Interrupted => "interrupted",
            Termination::Incomplete => "incomplete",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LatencySummary {
    pub min_ms: u64,
    pub avg_ms: u64,
    pub max_ms: u64,
    pub p50_ms: u64,
    pub p90_ms: u64,
    pub p99_ms: u64,
}

/// Everything the collector knows when the run ends.
#[derive(Clone, Debug)]
pub struct CollectorReport {
    pub termination: Termination,
    pub completed: u64,
    pub skipped: u64,
    pub histogram: super::StatusHistogram,
    pub latency: LatencySummary,
    pub failure: Option<FailureSignal>,
}
