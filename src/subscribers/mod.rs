//! # Event subscribers for the testvisor scheduler.
//!
//! This module provides the [`Subscribe`] trait and a built-in implementation
//! for handling lifecycle events delivered through the
//! [`EventBus`](crate::events::EventBus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Scheduler ── emit(&Event) ──► EventBus ──► snapshot of subscribers
//!                                                 │
//!                                                 ├──► Subscribe::on_event(&Event)  (awaited)
//!                                                 │         │
//!                                                 │    ┌────┴──────┬─────────┐
//!                                                 │    ▼           ▼         ▼
//!                                                 │  LogWriter  Reporter  Custom ...
//!                                                 │
//!                                                 └──► next subscriber only after the
//!                                                      previous handler returned
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use testvisor::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct FailureCounter;
//!
//! #[async_trait]
//! impl Subscribe for FailureCounter {
//!     async fn on_event(&self, event: &Event) {
//!         match event.kind {
//!             EventKind::TestFileFailure => {
//!                 // increment failure counter
//!             }
//!             _ => {}
//!         }
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscribe::Subscribe;
