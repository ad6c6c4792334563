//! # Lifecycle events emitted by the scheduler.
//!
//! The [`EventKind`] enum classifies the three per-file notifications:
//! one start and exactly one terminal (success or failure) for every
//! admitted test. The [`Event`] struct carries the test descriptor plus
//! kind-dependent payload (result or error).
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Within one test file, the start event always precedes
//! the terminal event; across files, terminal events arrive in completion
//! order, which is unordered by design under the parallel strategy.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use testvisor::{Event, EventKind, ProjectConfig, ResolverHandle, TestFile};
//!
//! let test = Arc::new(TestFile::new(
//!     "/repo/math.test.js",
//!     Arc::new(ProjectConfig::new("repo", "/repo")),
//!     ResolverHandle::new("r"),
//! ));
//!
//! let started = Event::start(Arc::clone(&test));
//! let failed = Event::failure(test, testvisor::ExecError::failure("boom"));
//!
//! assert_eq!(started.kind, EventKind::TestFileStart);
//! assert!(!started.is_terminal());
//! assert!(failed.is_terminal());
//! assert!(failed.seq > started.seq);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::error::ExecError;
use crate::suite::{TestFile, TestResult};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of test lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Test file was admitted and is about to be dispatched.
    ///
    /// Sets:
    /// - `test`: the admitted test file
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TestFileStart,

    /// Test file finished and produced a result.
    ///
    /// Sets:
    /// - `test`: the test file
    /// - `result`: counters reported by the executor
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TestFileSuccess,

    /// Test file execution failed.
    ///
    /// Sets:
    /// - `test`: the test file
    /// - `error`: the failure, ordinary or pool-level
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TestFileFailure,
}

/// Lifecycle event with its test descriptor and kind-dependent payload.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - `result`/`error` are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// The test file this event is about.
    pub test: Arc<TestFile>,
    /// Execution result (success events only).
    pub result: Option<TestResult>,
    /// Execution error (failure events only).
    pub error: Option<ExecError>,
}

impl Event {
    fn new(kind: EventKind, test: Arc<TestFile>) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            test,
            result: None,
            error: None,
        }
    }

    /// Creates a start event for an admitted test file.
    #[inline]
    pub fn start(test: Arc<TestFile>) -> Self {
        Event::new(EventKind::TestFileStart, test)
    }

    /// Creates a success event carrying the executor's result.
    #[inline]
    pub fn success(test: Arc<TestFile>, result: TestResult) -> Self {
        let mut ev = Event::new(EventKind::TestFileSuccess, test);
        ev.result = Some(result);
        ev
    }

    /// Creates a failure event carrying the execution error.
    #[inline]
    pub fn failure(test: Arc<TestFile>, error: ExecError) -> Self {
        let mut ev = Event::new(EventKind::TestFileFailure, test);
        ev.error = Some(error);
        ev
    }

    /// Returns `true` for success and failure events.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self.kind, EventKind::TestFileStart)
    }
}
