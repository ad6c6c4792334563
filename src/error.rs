//! Error types used by the testvisor scheduler and its collaborators.
//!
//! This module defines one error enum:
//!
//! - [`ExecError`] — errors raised while executing a single test file.
//!
//! The type provides helper methods (`as_label`, `as_message`) for logging
//! and [`ExecError::is_fatal`] for the scheduler's escalation decision.

use thiserror::Error;

/// # Errors produced by test-file execution.
///
/// The scheduler recognizes two severities:
///
/// - [`ExecError::Failure`] is an ordinary test failure. It is reported as a
///   failure event and the run continues.
/// - [`ExecError::PoolFault`] means the worker pool itself is broken (for
///   example a worker crashed more times than its retry budget allows). The
///   run stops admitting tests and resolves fatally.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// Test file ran but did not pass, or execution raised an ordinary error.
    #[error("test run failed: {error}")]
    Failure {
        /// The underlying error message.
        error: String,
    },

    /// The worker pool is unusable; no further tests can be dispatched.
    #[error("worker pool fault: {error}")]
    PoolFault {
        /// The underlying error message.
        error: String,
    },
}

impl ExecError {
    /// Builds an ordinary failure from any displayable error.
    pub fn failure(error: impl std::fmt::Display) -> Self {
        ExecError::Failure {
            error: error.to_string(),
        }
    }

    /// Builds a pool-level fault from any displayable error.
    pub fn pool_fault(error: impl std::fmt::Display) -> Self {
        ExecError::PoolFault {
            error: error.to_string(),
        }
    }

    /// Returns `true` if the error poisons the whole run rather than a
    /// single test file.
    ///
    /// # Example
    /// ```
    /// use testvisor::ExecError;
    ///
    /// let ordinary = ExecError::failure("2 assertions failed");
    /// assert!(!ordinary.is_fatal());
    ///
    /// let fault = ExecError::pool_fault("worker exceeded retry limit");
    /// assert!(fault.is_fatal());
    /// ```
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExecError::PoolFault { .. })
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use testvisor::ExecError;
    ///
    /// let err = ExecError::failure("boom");
    /// assert_eq!(err.as_label(), "test_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ExecError::Failure { .. } => "test_failed",
            ExecError::PoolFault { .. } => "pool_fault",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ExecError::Failure { error } => format!("failed: {error}"),
            ExecError::PoolFault { error } => format!("pool fault: {error}"),
        }
    }
}
