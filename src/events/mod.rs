//! Lifecycle events: types and delivery bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! deliver lifecycle events emitted by the scheduler to registered
//! subscribers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload
//! - [`EventBus`] snapshot-based registry with awaited, serialized delivery
//!
//! ## Quick reference
//! - **Publisher**: the scheduler's admission/completion loop (single
//!   emitter, so global event order matches `seq` order).
//! - **Consumers**: anything implementing
//!   [`Subscribe`](crate::subscribers::Subscribe), e.g. reporters.
//!
//! See the crate-level docs for the system-level wiring diagram.

mod bus;
mod event;

pub use bus::EventBus;
pub use event::{Event, EventKind};
