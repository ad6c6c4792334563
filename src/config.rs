//! # Per-run scheduling configuration.
//!
//! Provides [`RunConfig`], the settings a host hands to the scheduler for
//! a run (or a series of runs in watch mode).
//!
//! Config is used in two ways:
//! 1. **Scheduler creation**: `Scheduler::builder(config, pools, executor)`
//! 2. **In-band execution**: forwarded by reference into [`ExecuteFile::execute`]
//!
//! ## Sentinel values
//! - `max_workers = 0` → clamped to 1 (see [`RunConfig::workers`])
//!
//! [`ExecuteFile::execute`]: crate::ExecuteFile::execute

use std::num::NonZeroUsize;
use std::thread::available_parallelism;

/// Configuration for one scheduler.
///
/// Defines:
/// - **Strategy selection**: sequential in-band vs parallel pool dispatch
/// - **Concurrency width**: max simultaneous test-file executions
/// - **Crash tolerance**: worker retry budget (consumed by the pool)
/// - **Worker stdio**: whether worker output is forwarded to the parent
///
/// ## Field semantics
/// - `serial`: `true` runs every test in the scheduler's own process, one at a time
/// - `max_workers`: parallel-strategy width (`0` is treated as `1`)
/// - `max_retries`: re-dispatch budget after a worker crash, applied inside the pool
/// - `forward_stdio`: pipe worker stdout/stderr through to the parent process
///
/// ## Notes
/// All fields are public for flexibility. Prefer [`RunConfig::workers`] over
/// reading `max_workers` directly so the minimum-of-1 clamp stays in one place.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Run test files sequentially inside the current process.
    ///
    /// When `true`:
    /// - No worker pool is created for the run
    /// - Execution goes through the in-band [`ExecuteFile`] seam
    /// - Cancellation is checked before each test
    ///
    /// [`ExecuteFile`]: crate::ExecuteFile
    pub serial: bool,

    /// Maximum number of test files executing at the same time.
    ///
    /// - `0` = clamped to 1
    /// - `n > 0` = at most `n` concurrent dispatches
    ///
    /// Only meaningful for the parallel strategy; the sequential strategy
    /// always runs one test at a time.
    pub max_workers: usize,

    /// How many times the pool may re-dispatch a test after its worker
    /// process dies mid-run.
    ///
    /// The scheduler never observes individual retries; a test whose budget
    /// is exhausted surfaces as a single [`ExecError`] from the pool.
    ///
    /// [`ExecError`]: crate::ExecError
    pub max_retries: u32,

    /// Forward worker stdout/stderr to the parent process.
    ///
    /// Handed to the pool through `PoolOptions`; the scheduler itself never
    /// touches worker output.
    pub forward_stdio: bool,
}

impl RunConfig {
    /// Returns the parallel-strategy width clamped to a minimum of 1.
    #[inline]
    pub fn workers(&self) -> usize {
        self.max_workers.max(1)
    }
}

impl Default for RunConfig {
    /// Default configuration:
    ///
    /// - `serial = false` (parallel strategy)
    /// - `max_workers = available parallelism` (1 if it cannot be determined)
    /// - `max_retries = 3` (bounded crash tolerance per test)
    /// - `forward_stdio = true` (worker output is visible)
    fn default() -> Self {
        Self {
            serial: false,
            max_workers: available_parallelism().map(NonZeroUsize::get).unwrap_or(1),
            max_retries: 3,
            forward_stdio: true,
        }
    }
}
