//! # Event bus: ordered, awaited fan-out to subscribers.
//!
//! [`EventBus`] keeps the registry of [`Subscribe`] implementations and
//! delivers each emitted [`Event`] to every registered subscriber, one
//! after another, awaiting each handler before the next.
//!
//! ## What it guarantees
//! - Per-event snapshot: the subscriber list is captured at emission time,
//!   so registrations made while an event is being delivered take effect
//!   from the next event onward.
//! - Exactly-once, in-order delivery to each registered subscriber.
//! - Panics inside subscribers are caught and logged (isolation).
//!
//! ## What it does **not** guarantee
//! - No replay: subscribers registered after an event never see it.
//! - No queueing: a slow handler delays the whole emission path.
//!
//! ## Diagram
//! ```text
//!    emit(&Event).await
//!        │        (snapshot registry)
//!        ├──► S1.on_event(&ev).await
//!        ├──► S2.on_event(&ev).await     (only after S1 returned)
//!        └──► SN.on_event(&ev).await
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use futures::FutureExt;
use tracing::error;

use crate::events::Event;
use crate::subscribers::Subscribe;

/// Shared subscriber registry with awaited, serialized delivery.
///
/// Cheap to clone; clones share the same registry.
#[derive(Clone, Default)]
pub struct EventBus {
    subs: Arc<RwLock<Vec<Arc<dyn Subscribe>>>>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber for all subsequent events.
    pub fn subscribe(&self, sub: Arc<dyn Subscribe>) {
        self.subs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sub);
    }

    /// Removes every subscriber whose [`Subscribe::name`] matches.
    ///
    /// Returns `true` if at least one subscriber was removed. Events already
    /// being delivered still reach the removed subscriber (snapshot rule).
    pub fn unsubscribe(&self, name: &str) -> bool {
        let mut subs = self.subs.write().unwrap_or_else(PoisonError::into_inner);
        let before = subs.len();
        subs.retain(|s| s.name() != name);
        subs.len() != before
    }

    /// Delivers one event to all currently registered subscribers.
    ///
    /// Returns only after every handler has returned (or panicked). A
    /// panicking handler is logged and skipped; the rest still run.
    pub async fn emit(&self, event: &Event) {
        let snapshot: Vec<Arc<dyn Subscribe>> = {
            let subs = self.subs.read().unwrap_or_else(PoisonError::into_inner);
            subs.clone()
        };

        for sub in snapshot {
            let fut = sub.on_event(event);
            if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                error!(
                    subscriber = sub.name(),
                    "subscriber panicked during event delivery: {panic_err:?}"
                );
            }
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
