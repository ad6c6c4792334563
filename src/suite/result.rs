//! # Per-file execution results.
//!
//! Defines [`TestResult`], the counters an executor reports for one test
//! file. The scheduler forwards results to subscribers without inspecting
//! them; only the `Ok`/`Err` shape of the execution outcome matters for
//! scheduling decisions.

use std::time::Duration;

/// Outcome counters for one executed test file.
///
/// Produced by the execution seam (in-band executor or worker pool) and
/// carried on success events. All fields are plain data; reporters decide
/// what they mean.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestResult {
    /// Number of passing test cases in the file.
    pub passed: u32,
    /// Number of failing test cases in the file.
    pub failed: u32,
    /// Number of skipped test cases in the file.
    pub skipped: u32,
    /// Wall-clock time the file took to execute.
    pub duration: Duration,
}

impl TestResult {
    /// Creates a result with explicit counters.
    pub fn new(passed: u32, failed: u32, skipped: u32, duration: Duration) -> Self {
        Self {
            passed,
            failed,
            skipped,
            duration,
        }
    }

    /// Total number of test cases the file reported.
    pub fn total(&self) -> u32 {
        self.passed + self.failed + self.skipped
    }
}
