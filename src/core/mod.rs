//! Scheduler core: admission and run lifecycle.
//!
//! This module contains the scheduling half of testvisor. The public API
//! from this module is [`Scheduler`] (plus its builder and the outcome
//! types); the admission gate stays internal.
//!
//! Internal modules:
//! - [`scheduler`]: strategy selection, dispatch loop, classification, teardown;
//! - [`builder`]: wires subscribers and execution seams into a scheduler;
//! - [`gate`]: FIFO counting gate bounding concurrent dispatch;
//! - [`outcome`]: run resolution types.

mod builder;
mod gate;
mod outcome;
mod scheduler;

pub use builder::SchedulerBuilder;
pub use outcome::{RunOutcome, RunSummary};
pub use scheduler::Scheduler;
