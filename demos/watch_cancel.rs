//! # Example: watch_cancel
//!
//! Demonstrates cooperative cancellation of a parallel run from a watch signal.
//!
//! Shows how to:
//! - Implement the [`SpawnPool`] / [`WorkerPool`] seam for fan-out dispatch.
//! - Interrupt a run mid-flight with [`ManualWatcher::interrupt`].
//! - Observe that in-flight dispatches drain while admission stops.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► RunConfig { max_workers: 2 }
//!   ├─► Scheduler::builder(cfg, SleepySpawner, InBand)
//!   ├─► spawn trigger task: sleep 450ms ──► watcher.interrupt()
//!   └─► run_tests(5 files, &watcher)
//!         ├─► t=0ms    a, b admitted (gate full)
//!         ├─► t=300ms  a, b resolve; c, d admitted
//!         ├─► t=450ms  interrupt ──► admission stops, e never starts
//!         ├─► t=600ms  c, d resolve (in-flight always drains)
//!         └─► Cancelled
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example watch_cancel
//! RUST_LOG=debug cargo run --example watch_cancel   # scheduler internals
//! ```

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use testvisor::{
    Event, EventKind, ExecContext, ExecError, ExecuteFile, ManualWatcher, PoolOptions,
    ProjectConfig, ResolverHandle, RunConfig, RunOutcome, Scheduler, SpawnPool, Subscribe,
    TestFile, TestResult, WorkerPool,
};

/// How long each dispatched file pretends to run.
const DISPATCH_TIME: Duration = Duration::from_millis(300);

/// Console subscriber that prints the lifecycle stream as it arrives.
struct PrintSub;

#[async_trait]
impl Subscribe for PrintSub {
    async fn on_event(&self, event: &Event) {
        let name = short_name(&event.test);
        match event.kind {
            EventKind::TestFileStart => println!("[sub] seq={} start {name}", event.seq),
            EventKind::TestFileSuccess => println!("[sub] seq={} pass  {name}", event.seq),
            EventKind::TestFileFailure => println!("[sub] seq={} fail  {name}", event.seq),
        }
    }

    fn name(&self) -> &'static str {
        "print"
    }
}

/// Worker pool stand-in: every dispatch sleeps, then reports green counters.
struct SleepyPool;

#[async_trait]
impl WorkerPool for SleepyPool {
    async fn dispatch(&self, test: Arc<TestFile>) -> Result<TestResult, ExecError> {
        println!("[pool] dispatching {}", short_name(&test));
        tokio::time::sleep(DISPATCH_TIME).await;
        Ok(TestResult::new(8, 0, 0, DISPATCH_TIME))
    }

    async fn shutdown(&self) {
        println!("[pool] shutdown");
    }
}

struct SleepySpawner;

impl SpawnPool for SleepySpawner {
    fn spawn(&self, options: PoolOptions) -> Arc<dyn WorkerPool> {
        println!("[pool] spawned with {} workers", options.num_workers);
        Arc::new(SleepyPool)
    }
}

/// Parallel runs never execute in-band, but the seam is always wired.
struct InBand;

#[async_trait]
impl ExecuteFile for InBand {
    async fn execute(
        &self,
        _test: &TestFile,
        _config: &RunConfig,
        _ctx: ExecContext,
    ) -> Result<TestResult, ExecError> {
        Ok(TestResult::default())
    }
}

fn short_name(test: &TestFile) -> String {
    test.path()
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<test>")
        .to_owned()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Surface the scheduler's own logs when RUST_LOG is set.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    println!("=== watch_cancel example ===\n");

    // 1. Configure a parallel run over two workers.
    let cfg = RunConfig {
        max_workers: 2,
        ..RunConfig::default()
    };

    // 2. Build the scheduler with the demo pool and a console subscriber.
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(PrintSub)];
    let scheduler = Scheduler::builder(cfg, Arc::new(SleepySpawner), Arc::new(InBand))
        .with_subscribers(subs)
        .build();

    // 3. Describe the suite: five files, enough for three admission waves.
    let project = Arc::new(ProjectConfig::new("demo", "/demo"));
    let suite: Vec<TestFile> = ["a", "b", "c", "d", "e"]
        .into_iter()
        .map(|n| {
            TestFile::new(
                project.root.join(format!("{n}.test.js")),
                Arc::clone(&project),
                ResolverHandle::new("demo-resolver"),
            )
        })
        .collect();

    // 4. Trigger task: simulate a file change mid-run.
    let watcher = Arc::new(ManualWatcher::new());
    let trigger = {
        let watcher = Arc::clone(&watcher);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(450)).await;
            println!("\n[watch] file change detected, interrupting the run\n");
            watcher.interrupt();
        })
    };

    // 5. Run. The second wave drains after the interrupt; "e" never starts.
    let outcome = scheduler.run_tests(suite, watcher.as_ref()).await;
    trigger.await?;

    match &outcome {
        RunOutcome::Completed(summary) => println!(
            "\n[run] completed: admitted={} succeeded={} failed={}",
            summary.admitted, summary.succeeded, summary.failed
        ),
        RunOutcome::Cancelled => println!("\n[run] cancelled (as expected)"),
        RunOutcome::Fatal(error) => println!("\n[run] fatal: {error}"),
    }

    println!("\nfinished");
    Ok(())
}
