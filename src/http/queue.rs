use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use super::RequestSpec;

/// Bounded multi-consumer queue between the dispatcher and the workers.
///
/// The receiver is shared behind an async mutex; only the worker holding
/// the lock waits on the channel, the others wait on the lock.
#[derive(Clone, Debug)]
pub struct WorkQueue {
    rx: Arc<Mutex<mpsc::Receiver<RequestSpec>>>,
}

/// Creates the queue. The sender side belongs to the dispatcher alone.
#[must_use]
pub fn work_queue(capacity: usize) -> (mpsc::Sender<RequestSpec>, WorkQueue) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        tx,
        WorkQueue {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

impl WorkQueue {
    /// Waits for the next spec; `None` once the sender is gone and the queue is empty.
    pub async fn next(&self) -> Option<RequestSpec> {
        self.rx.lock().await.recv().await
    }

    /// Takes a spec only if one is already queued.
    pub async fn try_next(&self) -> Option<RequestSpec> {
        self.rx.lock().await.try_recv().ok()
    }
}
