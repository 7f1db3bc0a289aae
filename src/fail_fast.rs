//! One-shot failure channel used by workers under fail-fast mode.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;

use crate::metrics::FailureSignal;

/// Cloneable handle workers use to report the run-ending failure.
#[derive(Clone, Debug)]
pub struct FailFastSender {
    fired: Arc<AtomicBool>,
    tx: mpsc::Sender<FailureSignal>,
}

pub type FailFastReceiver = mpsc::Receiver<FailureSignal>;

#[must_use]
pub fn fail_fast_channel() -> (FailFastSender, FailFastReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (
        FailFastSender {
            fired: Arc::new(AtomicBool::new(false)),
            tx,
        },
        rx,
    )
}

impl FailFastSender {
    /// Delivers `signal` if no other failure was delivered before.
    ///
    /// Returns `true` only for the single winning caller.
    pub fn trigger(&self, signal: FailureSignal) -> bool {
        if self
            .fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        // Capacity is one and only the winner sends, so this cannot be full.
        self.tx.try_send(signal).is_ok()
    }

    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}
