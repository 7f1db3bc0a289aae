use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    args::ReqArgs,
    domain::RunConfig,
    error::{AppError, AppResult},
    fail_fast::fail_fast_channel,
    http::{
        self, ClientSettings, DispatchCounter, DispatchPhase, HttpExecutor, RequestExecutor,
        RequestGenerator, WorkerChannels,
    },
    metrics::{
        self, CollectorConfig, FailureSignal, LatencySummary, StatusHistogram, Termination,
        WorkerEvent,
    },
    shutdown::{ShutdownSender, shutdown_channel},
    shutdown_handlers::setup_signal_shutdown_handler,
    sinks::{FanoutSink, JsonLinesSink, LogSink, OutcomeSink},
};

/// How long finished runs wait for workers still inside a request.
const WORKER_GRACE_PERIOD: Duration = Duration::from_millis(250);

/// Result of one run, handed to the report printer.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub termination: Termination,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub total_requests: u64,
    pub dispatched: u64,
    pub completed: u64,
    pub skipped: u64,
    pub histogram: StatusHistogram,
    pub latency: LatencySummary,
    pub failure: Option<FailureSignal>,
}

impl RunReport {
    /// Process exit code for this termination.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self.termination {
            Termination::Completed => 0,
            Termination::Aborted => 2,
            Termination::Interrupted => 130,
            Termination::Incomplete => 3,
        }
    }
}

/// Runs the dispatcher, workers, and collector until the run ends.
///
/// Returns as soon as the collector reaches a terminal state. Requests
/// still in flight at that point are not cancelled; their workers get a
/// short grace period and are then detached.
///
/// # Errors
///
/// Returns an error if the collector or dispatcher task panics.
pub async fn run_load(
    config: &RunConfig,
    executor: Arc<dyn RequestExecutor>,
    sink: Box<dyn OutcomeSink>,
    shutdown_tx: &ShutdownSender,
) -> AppResult<RunReport> {
    let started_at = Utc::now();
    let run_start = Instant::now();
    let workers = config.workers.get();

    let generator =
        RequestGenerator::new(config.method, config.target.clone(), config.total_requests);
    let (queue_tx, queue) = http::work_queue(config.queue_capacity.get());
    let (phase_tx, phase_rx) = watch::channel(DispatchPhase::Dispatching);
    let (events_tx, events_rx) = mpsc::channel::<WorkerEvent>(workers);
    let (fail_tx, fail_rx) = fail_fast_channel();

    let collector_handle = metrics::setup_outcome_collector(
        CollectorConfig {
            total_requests: config.total_requests,
            quiet: config.quiet,
        },
        shutdown_tx,
        events_rx,
        fail_rx,
        sink,
    );

    let channels = WorkerChannels {
        queue,
        phase_rx,
        events_tx,
        fail_fast: config.fail_fast.then_some(fail_tx),
    };
    let worker_handles = http::spawn_workers(workers, &executor, &channels, shutdown_tx);
    drop(channels);

    let counter = DispatchCounter::new();
    let dispatcher_handle =
        http::spawn_dispatcher(generator, queue_tx, phase_tx, shutdown_tx, counter.clone());

    let report = collector_handle.await?;
    let elapsed = run_start.elapsed();

    // Stops the dispatcher and every idle worker.
    drop(shutdown_tx.send(()));
    let dispatched = dispatcher_handle.await?;

    match tokio::time::timeout(WORKER_GRACE_PERIOD, join_all(worker_handles)).await {
        Ok(exits) => {
            for exit in exits.into_iter().flatten() {
                debug!(
                    "Worker {} exited: {:?} ({} requests)",
                    exit.id, exit.reason, exit.handled
                );
            }
        }
        Err(_) => debug!("Detaching workers still waiting on in-flight requests"),
    }

    Ok(RunReport {
        termination: report.termination,
        started_at,
        elapsed,
        total_requests: config.total_requests,
        dispatched,
        completed: report.completed,
        skipped: report.skipped,
        histogram: report.histogram,
        latency: report.latency,
        failure: report.failure,
    })
}

/// Builds the client and sinks from CLI arguments and performs one run.
///
/// # Errors
///
/// Returns an error when the arguments are invalid, the HTTP client cannot
/// be built, or the outcome log cannot be created.
pub async fn run_local(args: &ReqArgs) -> AppResult<RunReport> {
    let config = RunConfig::from_args(args)?;
    let client = http::build_client(&ClientSettings::from(args))?;
    let executor: Arc<dyn RequestExecutor> = Arc::new(HttpExecutor::new(client));
    let sink = build_sink(args.outcomes_jsonl.as_deref())?;

    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    info!("Please wait, calling against [{}] ...", config.target);
    let result = run_load(&config, executor, sink, &shutdown_tx).await;
    drop(shutdown_tx.send(()));
    if let Err(err) = signal_handle.await {
        warn!("Signal handler task failed: {}", err);
    }
    result
}

fn build_sink(outcomes_jsonl: Option<&str>) -> AppResult<Box<dyn OutcomeSink>> {
    let sink = FanoutSink::new().with(Box::new(LogSink));
    let sink = match outcomes_jsonl {
        Some(path) => {
            let jsonl = JsonLinesSink::create(Path::new(path)).map_err(AppError::metrics)?;
            sink.with(Box::new(jsonl))
        }
        None => sink,
    };
    Ok(Box::new(sink))
}
