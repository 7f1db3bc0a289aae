use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::shutdown::ShutdownSender;

use super::{RequestGenerator, RequestSpec};

/// Whether the dispatcher may still push work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchPhase {
    Dispatching,
    /// Published exactly once, after the last push.
    NoMoreWork,
}

/// Number of specs the dispatcher managed to enqueue.
#[derive(Clone, Debug, Default)]
pub struct DispatchCounter(Arc<AtomicU64>);

impl DispatchCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    fn increment(&self) {
        self.0.fetch_add(1, Ordering::AcqRel);
    }
}

/// Feeds the generator into the bounded queue.
///
/// A full queue suspends the dispatcher; that is the only throttle on
/// production. Stops early on shutdown or when every worker is gone.
#[must_use]
pub fn spawn_dispatcher(
    generator: RequestGenerator,
    queue_tx: mpsc::Sender<RequestSpec>,
    phase_tx: watch::Sender<DispatchPhase>,
    shutdown_tx: &ShutdownSender,
    counter: DispatchCounter,
) -> JoinHandle<u64> {
    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::spawn(async move {
        for spec in generator {
            let sequence = spec.sequence;
            let sent = tokio::select! {
                biased;
                _ = shutdown_rx.recv() => false,
                result = queue_tx.send(spec) => result.is_ok(),
            };
            if !sent {
                debug!("Dispatcher stopped before request #{}", sequence);
                break;
            }
            counter.increment();
        }

        drop(queue_tx);
        phase_tx.send_replace(DispatchPhase::NoMoreWork);
        debug!("Dispatcher finished after {} requests", counter.get());
        counter.get()
    })
}
