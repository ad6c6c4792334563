//! # Worker-pool contract for the parallel strategy.
//!
//! This module defines the two traits the scheduler uses to run tests in
//! worker processes, plus the [`PoolOptions`] bundle it hands over at pool
//! creation.
//!
//! ## Rules
//! - One pool per run: the scheduler calls [`SpawnPool::spawn`] when a
//!   parallel run starts and [`WorkerPool::shutdown`] exactly once when the
//!   run resolves, on every path (completed, cancelled, fatal).
//! - Crash retries stay inside the pool. A worker death is invisible to the
//!   scheduler until the per-test retry budget is exhausted, at which point
//!   the dispatch resolves with [`ExecError::PoolFault`].
//!
//! [`ExecError::PoolFault`]: crate::ExecError::PoolFault

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ExecError;
use crate::suite::{TestFile, TestResult};

/// Options for creating one run's worker pool.
///
/// Derived from [`RunConfig`](crate::RunConfig) by the scheduler; hosts see
/// it only inside their [`SpawnPool`] implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolOptions {
    /// Number of worker processes to keep alive.
    pub num_workers: usize,
    /// Re-dispatch budget after a worker crash, per test file.
    pub max_retries: u32,
    /// Forward worker stdout/stderr to the parent process.
    pub forward_stdio: bool,
}

/// # One run's worker pool.
///
/// Owns the worker processes and the transport to them. The scheduler only
/// needs two operations: dispatch one test, and tear everything down.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use testvisor::{ExecError, TestFile, TestResult, WorkerPool};
///
/// struct Inline;
///
/// #[async_trait]
/// impl WorkerPool for Inline {
///     async fn dispatch(&self, test: Arc<TestFile>) -> Result<TestResult, ExecError> {
///         let _ = test;
///         Ok(TestResult::default())
///     }
///
///     async fn shutdown(&self) {}
/// }
/// ```
#[async_trait]
pub trait WorkerPool: Send + Sync + 'static {
    /// Executes one test file on a free worker.
    ///
    /// Resolves when the file has finished, after any internal crash
    /// retries. An `Err` carrying [`ExecError::Failure`] is an ordinary
    /// test failure; [`ExecError::PoolFault`] tells the scheduler the pool
    /// is beyond saving.
    ///
    /// [`ExecError::Failure`]: crate::ExecError::Failure
    /// [`ExecError::PoolFault`]: crate::ExecError::PoolFault
    async fn dispatch(&self, test: Arc<TestFile>) -> Result<TestResult, ExecError>;

    /// Tears down workers and releases pool resources.
    ///
    /// The scheduler calls this exactly once per run, after the last
    /// completion it intends to wait for. Implementations should be
    /// idempotent anyway; a watch session creates many pools over its
    /// lifetime and nothing may leak between runs.
    async fn shutdown(&self);
}

/// Factory for per-run worker pools.
///
/// Separating creation from use keeps the scheduler reusable across runs:
/// the factory lives as long as the scheduler, each pool only as long as
/// one parallel run.
pub trait SpawnPool: Send + Sync + 'static {
    /// Creates a pool sized and configured for one run.
    fn spawn(&self, options: PoolOptions) -> Arc<dyn WorkerPool>;
}
