//! # In-band execution contract for the sequential strategy.
//!
//! [`ExecuteFile`] runs one test file inside the scheduler's own process.
//! It is the sequential counterpart of
//! [`WorkerPool::dispatch`](crate::WorkerPool::dispatch): same inputs, same
//! error taxonomy, no pool underneath.

use async_trait::async_trait;

use crate::config::RunConfig;
use crate::error::ExecError;
use crate::exec::ExecContext;
use crate::suite::{TestFile, TestResult};

/// # In-process test-file executor.
///
/// Receives everything execution needs explicitly: the descriptor (which
/// carries project config and resolver), the run configuration, and the
/// [`ExecContext`] identity. Implementations must not rely on ambient
/// process state for any of these.
///
/// Errors returned here are always treated as ordinary failures; the
/// sequential strategy has no pool to break, so it never escalates.
#[async_trait]
pub trait ExecuteFile: Send + Sync + 'static {
    /// Runs one test file to completion in the current process.
    async fn execute(
        &self,
        test: &TestFile,
        config: &RunConfig,
        ctx: ExecContext,
    ) -> Result<TestResult, ExecError>;
}
