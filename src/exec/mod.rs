//! # Execution seams: worker pool and in-band executor.
//!
//! The scheduler never runs test code itself. It delegates to one of two
//! host-provided collaborators depending on the configured strategy:
//!
//! - [`SpawnPool`] / [`WorkerPool`] - parallel strategy. One pool is created
//!   per run, every test is dispatched to it, and the pool is torn down
//!   exactly once when the run resolves.
//! - [`ExecuteFile`] - sequential strategy. Tests run inside the current
//!   process one at a time; no pool is involved.
//!
//! [`ExecContext`] carries the per-execution identity (worker id) that
//! in-band execution would otherwise have to smuggle through process
//! globals.

mod context;
mod inband;
mod pool;

pub use context::ExecContext;
pub use inband::ExecuteFile;
pub use pool::{PoolOptions, SpawnPool, WorkerPool};
