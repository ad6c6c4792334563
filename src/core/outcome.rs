//! # Run resolution.
//!
//! A run always resolves to a [`RunOutcome`]; nothing about cancellation or
//! pool faults is thrown. Hosts match on the outcome and decide how to exit,
//! typically via [`RunOutcome::exit_code`].

use crate::error::ExecError;

/// Counters for the tests a run admitted.
///
/// `admitted` counts start events; every admitted test lands in exactly one
/// of `succeeded` or `failed` unless the run aborted fatally with dispatches
/// still in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Tests that got a start event.
    pub admitted: usize,
    /// Tests whose execution produced a result.
    pub succeeded: usize,
    /// Tests whose execution produced an error.
    pub failed: usize,
}

/// # Terminal state of one scheduler run.
///
/// - [`Completed`](RunOutcome::Completed): every admitted test finished and
///   the pool (if any) was torn down. Individual test failures are still
///   `Completed`; they live in the event stream and the summary.
/// - [`Cancelled`](RunOutcome::Cancelled): the watch signal preempted the
///   run. Events already emitted stay valid; un-admitted tests left no
///   trace.
/// - [`Fatal`](RunOutcome::Fatal): the worker pool broke. The run stopped
///   early and the host should exit non-zero.
///
/// # Example
/// ```
/// use testvisor::{ExecError, RunOutcome, RunSummary};
///
/// let done = RunOutcome::Completed(RunSummary::default());
/// assert_eq!(done.exit_code(), 0);
///
/// let cancelled = RunOutcome::Cancelled;
/// assert_eq!(cancelled.exit_code(), 0);
///
/// let fatal = RunOutcome::Fatal(ExecError::pool_fault("worker gone"));
/// assert_eq!(fatal.exit_code(), 1);
/// ```
#[derive(Clone, Debug)]
pub enum RunOutcome {
    /// Run finished normally; see the summary for counts.
    Completed(RunSummary),
    /// Run was preempted by the watch signal.
    Cancelled,
    /// Run aborted because the worker pool became unusable.
    Fatal(ExecError),
}

impl RunOutcome {
    /// Returns `true` for [`RunOutcome::Completed`].
    #[inline]
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }

    /// Returns `true` for [`RunOutcome::Cancelled`].
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled)
    }

    /// Returns `true` for [`RunOutcome::Fatal`].
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, RunOutcome::Fatal(_))
    }

    /// Process exit status for an embedding host.
    ///
    /// Completed and cancelled runs exit clean; cancellation is a normal
    /// watch-mode occurrence, not an error. Only a fatal pool fault asks
    /// for a non-zero exit.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Completed(_) | RunOutcome::Cancelled => 0,
            RunOutcome::Fatal(_) => 1,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RunOutcome::Completed(_) => "completed",
            RunOutcome::Cancelled => "cancelled",
            RunOutcome::Fatal(_) => "fatal",
        }
    }
}
