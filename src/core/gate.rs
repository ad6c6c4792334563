//! # Admission gate for concurrent dispatch.
//!
//! A thin wrapper over [`tokio::sync::Semaphore`] that bounds how many test
//! files execute at once. Waiters are served in FIFO order, which is what
//! keeps dispatch order equal to input order: the scheduler requests one
//! slot at a time and only moves to the next test once the previous one
//! holds its slot.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Holder of one admission slot; the slot frees when the permit drops.
pub(crate) struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

/// Counting gate with FIFO admission.
pub(crate) struct Gate {
    sem: Arc<Semaphore>,
}

impl Gate {
    /// Creates a gate with `width` slots (clamped to a minimum of 1).
    pub(crate) fn new(width: usize) -> Self {
        Self {
            sem: Arc::new(Semaphore::new(width.max(1))),
        }
    }

    /// Waits for a free slot.
    ///
    /// Returns `None` only if the gate was closed, which the scheduler
    /// never does; callers treat it as "stop admitting".
    pub(crate) async fn acquire(&self) -> Option<GatePermit> {
        match Arc::clone(&self.sem).acquire_owned().await {
            Ok(permit) => Some(GatePermit { _permit: permit }),
            Err(_closed) => None,
        }
    }
}
