//! # Example: serial_run
//!
//! Demonstrates a sequential in-process run with the built-in log subscriber.
//!
//! Shows how to:
//! - Implement the [`ExecuteFile`] seam for in-band execution.
//! - Build a [`Scheduler`] with [`LogWriter`] attached.
//! - Read the per-run counters out of [`RunOutcome::Completed`].
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► RunConfig { serial: true }
//!   ├─► Scheduler::builder(cfg, spawner, MockExec)
//!   │     └─► LogWriter subscribed to the bus
//!   └─► run_tests(suite, &watcher)
//!         ├─► TestFileStart ──► MockExec::execute (one at a time, worker id 1)
//!         ├─► TestFileSuccess / TestFileFailure per file
//!         └─► Completed(summary) once the suite is exhausted
//! ```
//!
//! ## Run
//! Requires the `logging` feature to export [`LogWriter`].
//! ```bash
//! cargo run --example serial_run --features logging
//! ```

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use testvisor::{
    ExecContext, ExecError, ExecuteFile, LogWriter, ManualWatcher, PoolOptions, ProjectConfig,
    ResolverHandle, RunConfig, RunOutcome, Scheduler, SpawnPool, Subscribe, TestFile, TestResult,
    WorkerPool,
};

/// In-band executor that fakes running a file: sleeps a bit, then reports
/// counters. Files named `flaky.*` fail so the failure path shows up too.
struct MockExec;

#[async_trait]
impl ExecuteFile for MockExec {
    async fn execute(
        &self,
        test: &TestFile,
        _config: &RunConfig,
        ctx: ExecContext,
    ) -> Result<TestResult, ExecError> {
        let name = test
            .path()
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<test>")
            .to_owned();

        println!("[exec] worker={} running {name}", ctx.worker_id);
        tokio::time::sleep(Duration::from_millis(150)).await;

        if name.starts_with("flaky") {
            return Err(ExecError::failure("2 assertions failed (demo)"));
        }
        Ok(TestResult::new(12, 0, 1, Duration::from_millis(150)))
    }
}

/// Serial runs never dispatch on the pool, but the seam is always wired.
struct NoopPool;

#[async_trait]
impl WorkerPool for NoopPool {
    async fn dispatch(&self, _test: Arc<TestFile>) -> Result<TestResult, ExecError> {
        Ok(TestResult::default())
    }

    async fn shutdown(&self) {}
}

struct NoopSpawner;

impl SpawnPool for NoopSpawner {
    fn spawn(&self, _options: PoolOptions) -> Arc<dyn WorkerPool> {
        Arc::new(NoopPool)
    }
}

/// Builds a test file inside the demo project.
fn test_file(project: &Arc<ProjectConfig>, name: &str) -> TestFile {
    TestFile::new(
        project.root.join(name),
        Arc::clone(project),
        ResolverHandle::new("demo-resolver"),
    )
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== serial_run example ===\n");

    // 1. Configure a sequential run.
    let cfg = RunConfig {
        serial: true,
        ..RunConfig::default()
    };

    // 2. Attach the built-in log subscriber so every event is visible.
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];

    // 3. Build the scheduler with the demo execution seams.
    let scheduler = Scheduler::builder(cfg, Arc::new(NoopSpawner), Arc::new(MockExec))
        .with_subscribers(subs)
        .build();

    // 4. Describe the suite: three files, one of them failing.
    let project = Arc::new(ProjectConfig::new("demo", "/demo"));
    let suite = vec![
        test_file(&project, "login.test.js"),
        test_file(&project, "flaky.test.js"),
        test_file(&project, "checkout.test.js"),
    ];

    // 5. Run to completion. Nothing ever interrupts this watcher.
    let watcher = ManualWatcher::new();
    let outcome = scheduler.run_tests(suite, &watcher).await;

    match &outcome {
        RunOutcome::Completed(summary) => println!(
            "\n[run] completed: admitted={} succeeded={} failed={}",
            summary.admitted, summary.succeeded, summary.failed
        ),
        RunOutcome::Cancelled => println!("\n[run] cancelled"),
        RunOutcome::Fatal(error) => println!("\n[run] fatal: {error}"),
    }
    println!("[run] exit code: {}", outcome.exit_code());

    println!("\nfinished");
    Ok(())
}
