//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging reporters and other event
//! consumers into the scheduler. Subscribers are invoked inline by the
//! [`EventBus`](crate::events::EventBus): the scheduler awaits every handler
//! before moving on, so delivery is ordered and exactly-once.
//!
//! ## Contract
//! - Handlers run on the scheduler's emission path. A slow handler slows the
//!   run down; it never loses events.
//! - Panics inside a handler are caught and logged; remaining subscribers
//!   still receive the event.
//!
//! ## Example (skeleton)
//! ```rust
//! // use testvisor::{Event, Subscribe};
//! //
//! // struct Reporter;
//! // #[async_trait::async_trait]
//! // impl Subscribe for Reporter {
//! //     async fn on_event(&self, ev: &Event) {
//! //         // update progress output...
//! //     }
//! //     fn name(&self) -> &'static str { "reporter" }
//! // }
//! ```

use crate::events::Event;
use async_trait::async_trait;

/// Contract for event subscribers.
///
/// Called inline during event emission. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    ///
    /// # Parameters
    /// - `event`: Reference to the event (does not transfer ownership)
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs and targeted unsubscribe).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
