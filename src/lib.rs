//! # testvisor
//!
//! **Testvisor** is a test-run scheduling library for Rust.
//!
//! It takes an ordered list of test files and runs them to completion,
//! either sequentially in the current process or fanned out over a bounded
//! worker pool, while reporting every lifecycle transition as an ordered
//! event stream. It is designed as the scheduling core for test runners
//! with watch modes: runs are cheap to cancel, impossible to leak, and
//! safe to repeat.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   TestFile   │   │   TestFile   │   │   TestFile   │
//!     │ (discovered) │   │ (discovered) │   │ (discovered) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Scheduler (run orchestrator)                                     │
//! │  - EventBus (ordered, awaited delivery to subscribers)            │
//! │  - Gate (FIFO admission, width = RunConfig::workers)              │
//! │  - CancelSignal (one-shot token derived from the Watcher)         │
//! └──────┬──────────────────────────────┬─────────────────────────────┘
//!        ▼ serial                       ▼ parallel
//! ┌──────────────────┐   ┌──────────────────────────────────────────┐
//! │   ExecuteFile    │   │  SpawnPool::spawn ──► WorkerPool         │
//! │ (in-band, one at │   │    dispatch() per admitted test          │
//! │  a time, worker  │   │    crash retries stay inside the pool    │
//! │  id = 1)         │   │    shutdown() exactly once per run       │
//! └────────┬─────────┘   └─────────────────────┬────────────────────┘
//!          │ Ok(result) / Err(error)           │ Ok(result) / Err(error)
//!          ▼                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                            EventBus                               │
//! │   TestFileStart ──► TestFileSuccess | TestFileFailure (per test)  │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                      sub1.on_event() ─► sub2.on_event() ─► ...
//!                      (awaited in order, panics isolated)
//! ```
//!
//! ### Run lifecycle
//! ```text
//! Vec<TestFile> + Watcher ──► Scheduler::run_tests()
//!
//! loop {
//!   ├─► completed dispatch? ──► emit TestFileSuccess / TestFileFailure
//!   │        └─ PoolFault ──► abort in-flight, shutdown pool ─► Fatal
//!   ├─► watch signal fired? ──► stop admitting, drain in-flight ─► Cancelled
//!   └─► gate slot free & tests remain?
//!            ├─► emit TestFileStart   (input order)
//!            └─► dispatch on the pool (or execute in-band)
//! }
//! all admitted tests resolved ─► shutdown pool ─► Completed(summary)
//! ```
//!
//! ## Features
//! | Area               | Description                                                          | Key types / traits                        |
//! |--------------------|----------------------------------------------------------------------|-------------------------------------------|
//! | **Scheduling**     | Bounded fan-out, FIFO admission, input-order dispatch.               | [`Scheduler`], [`RunConfig`]               |
//! | **Events**         | Ordered, exactly-once lifecycle stream for reporters.                | [`Event`], [`EventKind`], [`Subscribe`]    |
//! | **Execution seams**| Host-provided worker pool and in-band executor.                      | [`SpawnPool`], [`WorkerPool`], [`ExecuteFile`] |
//! | **Cancellation**   | Cooperative preemption from a watch session.                         | [`Watcher`], [`ManualWatcher`]             |
//! | **Outcomes**       | Tagged resolution instead of thrown errors.                          | [`RunOutcome`], [`RunSummary`]             |
//! | **Errors**         | Failure vs pool-fault taxonomy.                                      | [`ExecError`]                              |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use testvisor::{
//!     ExecContext, ExecError, ExecuteFile, ManualWatcher, PoolOptions, ProjectConfig,
//!     ResolverHandle, RunConfig, Scheduler, SpawnPool, TestFile, TestResult, WorkerPool,
//! };
//!
//! // Host-side executor: this is where a real runner loads and runs the file.
//! struct InBand;
//!
//! #[async_trait]
//! impl ExecuteFile for InBand {
//!     async fn execute(
//!         &self,
//!         _test: &TestFile,
//!         _config: &RunConfig,
//!         _ctx: ExecContext,
//!     ) -> Result<TestResult, ExecError> {
//!         Ok(TestResult::new(1, 0, 0, std::time::Duration::from_millis(1)))
//!     }
//! }
//!
//! // Host-side pool: unused in serial mode but always wired in.
//! struct Pool;
//!
//! #[async_trait]
//! impl WorkerPool for Pool {
//!     async fn dispatch(&self, _test: Arc<TestFile>) -> Result<TestResult, ExecError> {
//!         Ok(TestResult::default())
//!     }
//!     async fn shutdown(&self) {}
//! }
//!
//! struct Spawner;
//!
//! impl SpawnPool for Spawner {
//!     fn spawn(&self, _options: PoolOptions) -> Arc<dyn WorkerPool> {
//!         Arc::new(Pool)
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let cfg = RunConfig {
//!         serial: true,
//!         ..RunConfig::default()
//!     };
//!     let scheduler = Scheduler::builder(cfg, Arc::new(Spawner), Arc::new(InBand)).build();
//!
//!     let project = Arc::new(ProjectConfig::new("demo", "/demo"));
//!     let tests = vec![TestFile::new(
//!         "/demo/smoke.test.js",
//!         project,
//!         ResolverHandle::new("demo-resolver"),
//!     )];
//!
//!     let watcher = ManualWatcher::new();
//!     let outcome = scheduler.run_tests(tests, &watcher).await;
//!
//!     assert!(outcome.is_completed());
//!     assert_eq!(outcome.exit_code(), 0);
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod exec;
mod subscribers;
mod suite;
mod watch;

// ---- Public re-exports ----

pub use crate::core::{RunOutcome, RunSummary, Scheduler, SchedulerBuilder};
pub use config::RunConfig;
pub use error::ExecError;
pub use events::{Event, EventBus, EventKind};
pub use exec::{ExecContext, ExecuteFile, PoolOptions, SpawnPool, WorkerPool};
pub use subscribers::Subscribe;
pub use suite::{ProjectConfig, ResolverHandle, TestFile, TestResult};
pub use watch::{ManualWatcher, WatchNotice, Watcher};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
