use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error};

use crate::error::RequestError;
use crate::fail_fast::FailFastSender;
use crate::metrics::{FailureKind, FailureSignal, Outcome, WorkerEvent};
use crate::shutdown::{ShutdownReceiver, ShutdownSender};

use super::{DispatchPhase, RequestExecutor, RequestSpec, WorkQueue};

/// Channels every worker shares.
#[derive(Clone)]
pub struct WorkerChannels {
    pub queue: WorkQueue,
    pub phase_rx: watch::Receiver<DispatchPhase>,
    pub events_tx: mpsc::Sender<WorkerEvent>,
    /// `None` unless the run is fail-fast.
    pub fail_fast: Option<FailFastSender>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerExitReason {
    /// The dispatcher finished and the queue was drained.
    Drained,
    /// This worker reported a failure, or saw another worker report one.
    FailFast,
    Shutdown,
    /// The collector stopped listening.
    CollectorClosed,
}

#[derive(Clone, Copy, Debug)]
pub struct WorkerExit {
    pub id: usize,
    pub handled: u64,
    pub reason: WorkerExitReason,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WorkerState {
    Running,
    Stopping,
    Stopped(WorkerExitReason),
}

enum Flow {
    Continue,
    Stop(WorkerExitReason),
}

struct Worker {
    id: usize,
    executor: Arc<dyn RequestExecutor>,
    channels: WorkerChannels,
    shutdown_rx: ShutdownReceiver,
    handled: u64,
}

/// Spawns `count` workers, numbered from 1.
#[must_use]
pub fn spawn_workers(
    count: usize,
    executor: &Arc<dyn RequestExecutor>,
    channels: &WorkerChannels,
    shutdown_tx: &ShutdownSender,
) -> Vec<JoinHandle<WorkerExit>> {
    (1..=count)
        .map(|id| {
            let worker = Worker {
                id,
                executor: Arc::clone(executor),
                channels: channels.clone(),
                shutdown_rx: shutdown_tx.subscribe(),
                handled: 0,
            };
            tokio::spawn(worker.run())
        })
        .collect()
}

impl Worker {
    async fn run(mut self) -> WorkerExit {
        let mut state = WorkerState::Running;
        let reason = loop {
            state = match state {
                WorkerState::Running => self.step_running().await,
                WorkerState::Stopping => self.step_stopping().await,
                WorkerState::Stopped(reason) => break reason,
            };
        };
        debug!(
            "Worker {} stopped ({:?}) after {} requests",
            self.id, reason, self.handled
        );
        WorkerExit {
            id: self.id,
            handled: self.handled,
            reason,
        }
    }

    async fn step_running(&mut self) -> WorkerState {
        if self.failure_reported() {
            return WorkerState::Stopped(WorkerExitReason::FailFast);
        }
        let queue = self.channels.queue.clone();
        let mut phase_rx = self.channels.phase_rx.clone();
        let next = tokio::select! {
            biased;
            _ = self.shutdown_rx.recv() => {
                return WorkerState::Stopped(WorkerExitReason::Shutdown);
            }
            spec = queue.next() => spec,
            _ = phase_rx.wait_for(|phase| *phase == DispatchPhase::NoMoreWork) => {
                return WorkerState::Stopping;
            }
        };
        match next {
            Some(spec) => self.handle_and_continue(spec, WorkerState::Running).await,
            None => WorkerState::Stopping,
        }
    }

    /// No more work will arrive; finish whatever is still queued.
    async fn step_stopping(&mut self) -> WorkerState {
        match self.shutdown_rx.try_recv() {
            Ok(()) | Err(broadcast::error::TryRecvError::Lagged(_)) => {
                return WorkerState::Stopped(WorkerExitReason::Shutdown);
            }
            Err(broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed) => {}
        }
        if self.failure_reported() {
            return WorkerState::Stopped(WorkerExitReason::FailFast);
        }
        match self.channels.queue.try_next().await {
            Some(spec) => self.handle_and_continue(spec, WorkerState::Stopping).await,
            None => WorkerState::Stopped(WorkerExitReason::Drained),
        }
    }

    async fn handle_and_continue(&mut self, spec: RequestSpec, next: WorkerState) -> WorkerState {
        match self.handle(spec).await {
            Flow::Continue => next,
            Flow::Stop(reason) => WorkerState::Stopped(reason),
        }
    }

    fn failure_reported(&self) -> bool {
        self.channels
            .fail_fast
            .as_ref()
            .is_some_and(FailFastSender::has_fired)
    }

    async fn handle(&mut self, spec: RequestSpec) -> Flow {
        self.handled = self.handled.saturating_add(1);
        let start = Instant::now();
        let result = self.executor.execute(&spec).await;
        let latency = start.elapsed();

        match result {
            Ok(response) => {
                let outcome = Outcome::from_response(&spec, self.id, response, latency);
                if !outcome.succeeded && self.channels.fail_fast.is_some() {
                    return self.report_failure(FailureKind::NonSuccessStatus, outcome);
                }
                self.emit(WorkerEvent::Completed(outcome)).await
            }
            Err(err) => {
                error!("Request #{} (worker {}): {}", spec.sequence, self.id, err);
                let kind = if err.is_construction() {
                    FailureKind::Construction
                } else {
                    FailureKind::Transport
                };
                let outcome = Outcome::from_error(&spec, self.id, &err, latency);
                if self.channels.fail_fast.is_some() {
                    return self.report_failure(kind, outcome);
                }
                match err {
                    RequestError::Construction { .. } => {
                        self.emit(WorkerEvent::Skipped {
                            sequence: spec.sequence,
                            worker: self.id,
                        })
                        .await
                    }
                    RequestError::Transport { .. } => {
                        self.emit(WorkerEvent::Completed(outcome)).await
                    }
                }
            }
        }
    }

    fn report_failure(&self, kind: FailureKind, outcome: Outcome) -> Flow {
        if let Some(fail_fast) = self.channels.fail_fast.as_ref()
            && !fail_fast.trigger(FailureSignal { kind, outcome })
        {
            debug!("Worker {}: an earlier failure already ended the run", self.id);
        }
        Flow::Stop(WorkerExitReason::FailFast)
    }

    async fn emit(&self, event: WorkerEvent) -> Flow {
        if self.channels.events_tx.send(event).await.is_err() {
            return Flow::Stop(WorkerExitReason::CollectorClosed);
        }
        Flow::Continue
    }
}
