//! # Scheduler: admission, dispatch, classification, guaranteed teardown.
//!
//! The [`Scheduler`] owns the event bus, the execution seams, and the run
//! configuration. Each [`run_tests`](Scheduler::run_tests) call is
//! self-contained: it derives a fresh cancellation token from the watcher,
//! picks a strategy, and resolves to a [`RunOutcome`] with nothing left
//! running.
//!
//! ## Event flow
//! For each admitted test the scheduler emits:
//! ```text
//! TestFileStart → [execution] → TestFileSuccess (result)
//!                             → TestFileFailure (error)
//! ```
//!
//! ## High-level architecture
//! ```text
//! Inputs to run_tests():
//!   Vec<TestFile> + &dyn Watcher ──► CancelSignal::derive ──► strategy (cfg.serial)
//!
//! Sequential:                          Parallel:
//!   loop per test {                      pool = SpawnPool::spawn(options)   (one per run)
//!     ├─ signal pre-check → Cancelled    loop {
//!     ├─ emit TestFileStart                ├─ completed dispatch → emit terminal,
//!     ├─ ExecuteFile::execute              │    PoolFault? → stop everything → Fatal
//!     └─ emit terminal                     ├─ token fired → stop admitting, keep draining
//!   }                                      └─ gate slot free → emit TestFileStart,
//!                                               spawn pool.dispatch on the slot
//!                                        }
//!                                        pool.shutdown()    (exactly once, every path)
//! ```
//!
//! ## Rules
//! - Dispatch order equals input order; completion order is whatever the
//!   workers produce.
//! - Every event is emitted from this loop, one at a time, so subscribers
//!   observe a single ordered stream.
//! - Cancellation stops admission only; in-flight dispatches drain and
//!   their terminal events still fire.
//! - The outcome tag is a race: a signal that fired before the run resolved
//!   yields `Cancelled` even when every dispatched test completed.
//! - A pool fault aborts in-flight dispatches: their workers are gone
//!   anyway, and draining a broken pool could hang forever.

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::config::RunConfig;
use crate::core::builder::SchedulerBuilder;
use crate::core::gate::Gate;
use crate::core::outcome::{RunOutcome, RunSummary};
use crate::error::ExecError;
use crate::events::{Event, EventBus};
use crate::exec::{ExecContext, ExecuteFile, PoolOptions, SpawnPool, WorkerPool};
use crate::suite::{TestFile, TestResult};
use crate::watch::{CancelSignal, Watcher};

/// Outcome of one dispatched test, joined back on the control loop.
type Dispatched = (Arc<TestFile>, Result<TestResult, ExecError>);

/// True once the run's interrupt is observable, through the one-shot token
/// or the watcher's own flag when the forwarder has not propagated it yet.
#[inline]
fn interrupt_observed(token: &CancellationToken, watcher: &dyn Watcher) -> bool {
    token.is_cancelled() || watcher.is_interrupted()
}

/// Coordinates test admission, execution, event delivery, and pool lifecycle.
///
/// ### Responsibilities
/// - **Strategy selection**: sequential in-band vs parallel pool dispatch
/// - **Admission control**: FIFO gate sized to [`RunConfig::workers`]
/// - **Event publishing**: one start and one terminal event per admitted test
/// - **Error classification**: ordinary failures flow, pool faults stop the run
/// - **Pool lifecycle**: spawn at run start, shut down exactly once at run end
///
/// ### Rules
/// - The scheduler is reusable: each `run_tests` call is independent, which
///   is what watch mode relies on.
/// - Cancellation stops work at admission checkpoints only; running test
///   code is never killed by a watch signal.
/// - Nothing is thrown: cancellation and pool faults come back as
///   [`RunOutcome`] variants.
pub struct Scheduler {
    cfg: RunConfig,
    bus: EventBus,
    spawner: Arc<dyn SpawnPool>,
    executor: Arc<dyn ExecuteFile>,
}

impl Scheduler {
    /// Creates a scheduler with an empty subscriber registry.
    pub fn new(
        cfg: RunConfig,
        spawner: Arc<dyn SpawnPool>,
        executor: Arc<dyn ExecuteFile>,
    ) -> Self {
        Self {
            cfg,
            bus: EventBus::new(),
            spawner,
            executor,
        }
    }

    /// Starts a builder; use it to attach subscribers before the first run.
    pub fn builder(
        cfg: RunConfig,
        spawner: Arc<dyn SpawnPool>,
        executor: Arc<dyn ExecuteFile>,
    ) -> SchedulerBuilder {
        SchedulerBuilder::new(cfg, spawner, executor)
    }

    pub(crate) fn with_bus(
        cfg: RunConfig,
        bus: EventBus,
        spawner: Arc<dyn SpawnPool>,
        executor: Arc<dyn ExecuteFile>,
    ) -> Self {
        Self {
            cfg,
            bus,
            spawner,
            executor,
        }
    }

    /// The scheduler's event bus, for runtime subscribe/unsubscribe.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The run configuration this scheduler was built with.
    pub fn config(&self) -> &RunConfig {
        &self.cfg
    }

    /// Runs the given test files until they finish, the watcher preempts
    /// the run, or the worker pool faults.
    ///
    /// ### Exit conditions
    /// - every admitted test resolved → [`RunOutcome::Completed`]
    /// - watch signal fired before the last completion → [`RunOutcome::Cancelled`]
    /// - pool fault surfaced from a dispatch → [`RunOutcome::Fatal`]
    ///
    /// ### Cancellation semantics
    /// - The token is derived once per run and fires at most once; admission
    ///   checkpoints also poll the watcher directly, so an interrupt raised
    ///   during event delivery is seen before the next test starts.
    /// - Sequential: checked before each test; the current test always
    ///   finishes and reports.
    /// - Parallel: checked while waiting for a gate slot and again when the
    ///   slot is granted; in-flight dispatches drain to their terminal
    ///   events before the run resolves `Cancelled`. A signal that fired
    ///   before the last dispatched test completed resolves the run
    ///   `Cancelled` even when every dispatched test then finished.
    /// - Tests never admitted leave no trace in the event stream.
    ///
    /// ### Fatal semantics
    /// The faulting test gets its failure event, a diagnostic is logged,
    /// in-flight dispatches are aborted (their terminal events are lost
    /// with the pool), and the pool is shut down before the outcome is
    /// returned. Hosts turn the outcome into an exit status via
    /// [`RunOutcome::exit_code`].
    pub async fn run_tests(&self, tests: Vec<TestFile>, watcher: &dyn Watcher) -> RunOutcome {
        let signal = CancelSignal::derive(watcher);
        if self.cfg.serial {
            self.run_serial(tests, watcher, signal.token()).await
        } else {
            self.run_parallel(tests, watcher, signal.token()).await
        }
    }

    /// Sequential strategy: in-band execution, one test at a time.
    ///
    /// The loop itself is the width-1 admission gate, and the pre-test check
    /// polls the watcher as well as the token, so an interrupt raised by a
    /// subscriber during delivery stops the very next admission. Every
    /// execution error is an ordinary failure here; with no pool underneath
    /// there is nothing to escalate.
    async fn run_serial(
        &self,
        tests: Vec<TestFile>,
        watcher: &dyn Watcher,
        token: &CancellationToken,
    ) -> RunOutcome {
        let mut summary = RunSummary::default();

        for test in tests {
            if interrupt_observed(token, watcher) {
                return RunOutcome::Cancelled;
            }

            let test = Arc::new(test);
            self.bus.emit(&Event::start(Arc::clone(&test))).await;
            summary.admitted += 1;

            let res = self
                .executor
                .execute(&test, &self.cfg, ExecContext::in_band())
                .await;
            match res {
                Ok(result) => {
                    summary.succeeded += 1;
                    self.bus.emit(&Event::success(test, result)).await;
                }
                Err(error) => {
                    summary.failed += 1;
                    self.bus.emit(&Event::failure(test, error)).await;
                }
            }
        }

        RunOutcome::Completed(summary)
    }

    /// Parallel strategy: spawn a pool, drive dispatch, tear the pool down.
    ///
    /// Teardown runs on every path out of the dispatch loop, so a watch
    /// session never leaks workers between runs.
    async fn run_parallel(
        &self,
        tests: Vec<TestFile>,
        watcher: &dyn Watcher,
        token: &CancellationToken,
    ) -> RunOutcome {
        let options = PoolOptions {
            num_workers: self.cfg.workers(),
            max_retries: self.cfg.max_retries,
            forward_stdio: self.cfg.forward_stdio,
        };
        let pool = self.spawner.spawn(options);
        debug!(workers = self.cfg.workers(), "worker pool spawned");

        let outcome = self.drive_dispatch(tests, watcher, token, &pool).await;

        pool.shutdown().await;
        debug!(outcome = outcome.as_label(), "worker pool shut down");
        outcome
    }

    /// The parallel control loop.
    ///
    /// Single consumer of the gate, single emitter of events. Branch order
    /// is biased: completions are classified before the token, and the
    /// token before new admissions, so a pool fault or cancellation that is
    /// already observable never loses to a pending admission. Resolution
    /// consults the signal itself, not just the `cancelled` flag:
    /// completions can win every biased poll and break the loop before the
    /// token branch is ever taken.
    async fn drive_dispatch(
        &self,
        tests: Vec<TestFile>,
        watcher: &dyn Watcher,
        token: &CancellationToken,
        pool: &Arc<dyn WorkerPool>,
    ) -> RunOutcome {
        let gate = Gate::new(self.cfg.workers());
        let mut inflight: JoinSet<Dispatched> = JoinSet::new();
        let mut queue = tests.into_iter();
        let mut pending = queue.next();

        let mut summary = RunSummary::default();
        let mut cancelled = interrupt_observed(token, watcher);
        let mut fatal: Option<ExecError> = None;

        loop {
            if cancelled {
                pending = None;
            }
            if pending.is_none() && inflight.is_empty() {
                break;
            }

            tokio::select! {
                biased;

                Some(joined) = inflight.join_next(), if !inflight.is_empty() => {
                    match joined {
                        Ok((test, Ok(result))) => {
                            summary.succeeded += 1;
                            self.bus.emit(&Event::success(test, result)).await;
                        }
                        Ok((test, Err(error))) => {
                            summary.failed += 1;
                            let fault = error.is_fatal();
                            self.bus.emit(&Event::failure(Arc::clone(&test), error.clone())).await;
                            if fault {
                                error!(
                                    test = %test.path().display(),
                                    error = %error,
                                    "worker pool fault; aborting run"
                                );
                                fatal = Some(error);
                                break;
                            }
                        }
                        Err(join) => {
                            // The descriptor is lost with the panicked task.
                            error!("dispatch task panicked: {join}");
                            fatal = Some(ExecError::pool_fault(format!(
                                "dispatch task panicked: {join}"
                            )));
                            break;
                        }
                    }
                }

                _ = token.cancelled(), if !cancelled => {
                    cancelled = true;
                }

                maybe_slot = gate.acquire(), if pending.is_some() => {
                    let slot = match maybe_slot {
                        Some(slot) => slot,
                        None => {
                            pending = None;
                            continue;
                        }
                    };
                    // The interrupt can land between the token's poll and
                    // the grant, or sit in the watcher ahead of the
                    // forwarder.
                    if interrupt_observed(token, watcher) {
                        cancelled = true;
                        drop(slot);
                        continue;
                    }
                    let Some(test) = pending.take() else { continue };
                    let test = Arc::new(test);

                    self.bus.emit(&Event::start(Arc::clone(&test))).await;
                    summary.admitted += 1;

                    let pool = Arc::clone(pool);
                    inflight.spawn(async move {
                        let res = pool.dispatch(Arc::clone(&test)).await;
                        drop(slot);
                        (test, res)
                    });
                    pending = queue.next();
                }
            }
        }

        if let Some(error) = fatal {
            inflight.shutdown().await;
            return RunOutcome::Fatal(error);
        }
        // The signal can fire while the loop is parked in `emit` and never
        // get polled; a signal that fired before resolution wins the race.
        if cancelled || interrupt_observed(token, watcher) {
            return RunOutcome::Cancelled;
        }
        RunOutcome::Completed(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::subscribers::Subscribe;
    use crate::suite::{ProjectConfig, ResolverHandle};
    use crate::watch::ManualWatcher;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    fn suite(names: &[&str]) -> Vec<TestFile> {
        let project = Arc::new(ProjectConfig::new("demo", "/demo"));
        names
            .iter()
            .map(|name| {
                TestFile::new(
                    format!("/demo/{name}.test.js"),
                    Arc::clone(&project),
                    ResolverHandle::new("demo-resolver"),
                )
            })
            .collect()
    }

    fn path_of(name: &str) -> PathBuf {
        PathBuf::from(format!("/demo/{name}.test.js"))
    }

    /// Scripted behavior for one test file inside a fake pool or executor.
    #[derive(Clone)]
    enum Script {
        Pass(Duration),
        Fail(&'static str, Duration),
        Fault(&'static str, Duration),
    }

    impl Script {
        async fn resolve(self) -> Result<TestResult, ExecError> {
            let (delay, res) = match self {
                Script::Pass(d) => (d, Ok(TestResult::new(1, 0, 0, d))),
                Script::Fail(msg, d) => (d, Err(ExecError::failure(msg))),
                Script::Fault(msg, d) => (d, Err(ExecError::pool_fault(msg))),
            };
            tokio::time::sleep(delay).await;
            res
        }
    }

    #[derive(Default)]
    struct ScriptedPool {
        scripts: Mutex<HashMap<PathBuf, Script>>,
        dispatched: Mutex<Vec<PathBuf>>,
        active: AtomicUsize,
        peak: AtomicUsize,
        shutdowns: AtomicUsize,
    }

    impl ScriptedPool {
        fn script(&self, name: &str, script: Script) {
            self.scripts.lock().unwrap().insert(path_of(name), script);
        }

        fn lookup(&self, path: &Path) -> Script {
            self.scripts
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .unwrap_or(Script::Pass(Duration::from_millis(10)))
        }

        fn dispatched(&self) -> Vec<PathBuf> {
            self.dispatched.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WorkerPool for ScriptedPool {
        async fn dispatch(&self, test: Arc<TestFile>) -> Result<TestResult, ExecError> {
            self.dispatched.lock().unwrap().push(test.path().to_path_buf());
            let script = self.lookup(test.path());

            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            let res = script.resolve().await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            res
        }

        async fn shutdown(&self) {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct ScriptedSpawner {
        pool: Arc<ScriptedPool>,
        spawned: AtomicUsize,
        last_options: Mutex<Option<PoolOptions>>,
    }

    impl SpawnPool for ScriptedSpawner {
        fn spawn(&self, options: PoolOptions) -> Arc<dyn WorkerPool> {
            self.spawned.fetch_add(1, Ordering::SeqCst);
            *self.last_options.lock().unwrap() = Some(options);
            Arc::clone(&self.pool) as Arc<dyn WorkerPool>
        }
    }

    #[derive(Default)]
    struct ScriptedExec {
        scripts: Mutex<HashMap<PathBuf, Script>>,
        calls: Mutex<Vec<(PathBuf, usize)>>,
    }

    impl ScriptedExec {
        fn script(&self, name: &str, script: Script) {
            self.scripts.lock().unwrap().insert(path_of(name), script);
        }

        fn calls(&self) -> Vec<(PathBuf, usize)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ExecuteFile for ScriptedExec {
        async fn execute(
            &self,
            test: &TestFile,
            _config: &RunConfig,
            ctx: ExecContext,
        ) -> Result<TestResult, ExecError> {
            self.calls
                .lock()
                .unwrap()
                .push((test.path().to_path_buf(), ctx.worker_id));
            let script = self
                .scripts
                .lock()
                .unwrap()
                .get(test.path())
                .cloned()
                .unwrap_or(Script::Pass(Duration::from_millis(1)));
            script.resolve().await
        }
    }

    struct Recorder {
        seen: Mutex<Vec<Event>>,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
            })
        }

        fn events(&self) -> Vec<Event> {
            self.seen.lock().unwrap().clone()
        }

        fn flow(&self) -> Vec<(EventKind, PathBuf)> {
            self.events()
                .iter()
                .map(|e| (e.kind, e.test.path().to_path_buf()))
                .collect()
        }

        fn starts(&self) -> Vec<PathBuf> {
            self.flow()
                .into_iter()
                .filter(|(kind, _)| *kind == EventKind::TestFileStart)
                .map(|(_, path)| path)
                .collect()
        }

        fn terminals(&self) -> Vec<PathBuf> {
            self.events()
                .iter()
                .filter(|e| e.is_terminal())
                .map(|e| e.test.path().to_path_buf())
                .collect()
        }
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().unwrap().push(event.clone());
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    /// Interrupts the watcher the first time any terminal event arrives.
    struct CancelOnTerminal {
        watcher: Arc<ManualWatcher>,
    }

    #[async_trait]
    impl Subscribe for CancelOnTerminal {
        async fn on_event(&self, event: &Event) {
            if event.is_terminal() {
                self.watcher.interrupt();
            }
        }

        fn name(&self) -> &'static str {
            "cancel-on-terminal"
        }
    }

    /// Holds terminal-event delivery open so completions and interrupts
    /// pile up behind the dispatch loop.
    struct SlowTerminal;

    #[async_trait]
    impl Subscribe for SlowTerminal {
        async fn on_event(&self, event: &Event) {
            if event.is_terminal() {
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
        }

        fn name(&self) -> &'static str {
            "slow-terminal"
        }
    }

    struct Rig {
        scheduler: Scheduler,
        spawner: Arc<ScriptedSpawner>,
        pool: Arc<ScriptedPool>,
        exec: Arc<ScriptedExec>,
        recorder: Arc<Recorder>,
    }

    fn rig(cfg: RunConfig) -> Rig {
        let pool = Arc::new(ScriptedPool::default());
        let spawner = Arc::new(ScriptedSpawner {
            pool: Arc::clone(&pool),
            ..ScriptedSpawner::default()
        });
        let exec = Arc::new(ScriptedExec::default());
        let recorder = Recorder::new();

        let scheduler = Scheduler::builder(
            cfg,
            Arc::clone(&spawner) as Arc<dyn SpawnPool>,
            Arc::clone(&exec) as Arc<dyn ExecuteFile>,
        )
        .with_subscribers(vec![recorder.clone() as _])
        .build();

        Rig {
            scheduler,
            spawner,
            pool,
            exec,
            recorder,
        }
    }

    fn serial_cfg() -> RunConfig {
        RunConfig {
            serial: true,
            ..RunConfig::default()
        }
    }

    fn parallel_cfg(workers: usize) -> RunConfig {
        RunConfig {
            serial: false,
            max_workers: workers,
            ..RunConfig::default()
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn serial_run_emits_ordered_pairs_and_never_spawns_a_pool() {
        let rig = rig(serial_cfg());
        let watcher = ManualWatcher::new();

        let outcome = rig
            .scheduler
            .run_tests(suite(&["a", "b", "c"]), &watcher)
            .await;

        let expected = vec![
            (EventKind::TestFileStart, path_of("a")),
            (EventKind::TestFileSuccess, path_of("a")),
            (EventKind::TestFileStart, path_of("b")),
            (EventKind::TestFileSuccess, path_of("b")),
            (EventKind::TestFileStart, path_of("c")),
            (EventKind::TestFileSuccess, path_of("c")),
        ];
        assert_eq!(rig.recorder.flow(), expected);

        let seqs: Vec<u64> = rig.recorder.events().iter().map(|e| e.seq).collect();
        assert!(seqs.windows(2).all(|w| w[0] < w[1]));

        match outcome {
            RunOutcome::Completed(summary) => {
                assert_eq!(summary.admitted, 3);
                assert_eq!(summary.succeeded, 3);
                assert_eq!(summary.failed, 0);
            }
            other => panic!("expected Completed, got {other:?}"),
        }

        assert_eq!(rig.spawner.spawned.load(Ordering::SeqCst), 0);
        assert!(rig.exec.calls().iter().all(|(_, worker)| *worker == 1));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn serial_run_absorbs_failures_and_continues() {
        let rig = rig(serial_cfg());
        rig.exec
            .script("b", Script::Fail("2 assertions failed", Duration::from_millis(1)));
        let watcher = ManualWatcher::new();

        let outcome = rig
            .scheduler
            .run_tests(suite(&["a", "b", "c"]), &watcher)
            .await;

        let flow = rig.recorder.flow();
        assert_eq!(flow[2], (EventKind::TestFileStart, path_of("b")));
        assert_eq!(flow[3], (EventKind::TestFileFailure, path_of("b")));
        assert_eq!(flow[4], (EventKind::TestFileStart, path_of("c")));

        match outcome {
            RunOutcome::Completed(summary) => {
                assert_eq!(summary.succeeded, 2);
                assert_eq!(summary.failed, 1);
            }
            other => panic!("expected Completed, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn serial_run_stops_at_the_next_admission_after_an_interrupt() {
        let rig = rig(serial_cfg());
        let watcher = Arc::new(ManualWatcher::new());
        rig.scheduler.bus().subscribe(Arc::new(CancelOnTerminal {
            watcher: Arc::clone(&watcher),
        }));

        let outcome = rig
            .scheduler
            .run_tests(suite(&["a", "b", "c"]), watcher.as_ref())
            .await;

        // The interrupt lands while "a" reports; the next pre-test check
        // reads the watcher flag directly, so "b" never starts.
        assert!(outcome.is_cancelled());
        assert_eq!(rig.recorder.starts(), vec![path_of("a")]);
        assert_eq!(rig.recorder.terminals(), vec![path_of("a")]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn pre_interrupted_watcher_cancels_before_any_event() {
        let rig = rig(serial_cfg());
        let watcher = ManualWatcher::new();
        watcher.interrupt();

        let outcome = rig.scheduler.run_tests(suite(&["a", "b"]), &watcher).await;

        assert!(outcome.is_cancelled());
        assert!(rig.recorder.events().is_empty());
        assert!(rig.exec.calls().is_empty());
        assert_eq!(rig.spawner.spawned.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn parallel_run_bounds_concurrency_and_dispatches_in_input_order() {
        let rig = rig(parallel_cfg(2));
        for name in ["a", "b", "c", "d"] {
            rig.pool.script(name, Script::Pass(Duration::from_millis(30)));
        }
        let watcher = ManualWatcher::new();

        let outcome = rig
            .scheduler
            .run_tests(suite(&["a", "b", "c", "d"]), &watcher)
            .await;

        match outcome {
            RunOutcome::Completed(summary) => {
                assert_eq!(summary.admitted, 4);
                assert_eq!(summary.succeeded, 4);
                assert_eq!(summary.failed, 0);
            }
            other => panic!("expected Completed, got {other:?}"),
        }

        assert_eq!(
            rig.pool.dispatched(),
            vec![path_of("a"), path_of("b"), path_of("c"), path_of("d")]
        );
        assert_eq!(rig.pool.peak.load(Ordering::SeqCst), 2);
        assert_eq!(rig.pool.shutdowns.load(Ordering::SeqCst), 1);
        assert_eq!(rig.spawner.spawned.load(Ordering::SeqCst), 1);

        // One start and one terminal per test, start first.
        for name in ["a", "b", "c", "d"] {
            let path = path_of(name);
            let starts = rig.recorder.starts();
            let terminals = rig.recorder.terminals();
            assert_eq!(starts.iter().filter(|p| **p == path).count(), 1);
            assert_eq!(terminals.iter().filter(|p| **p == path).count(), 1);
        }

        let options = rig.spawner.last_options.lock().unwrap().clone().unwrap();
        assert_eq!(options.num_workers, 2);
        assert_eq!(options.max_retries, 3);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn parallel_run_reports_ordinary_failures_and_finishes() {
        let rig = rig(parallel_cfg(2));
        rig.pool
            .script("b", Script::Fail("1 assertion failed", Duration::from_millis(20)));
        let watcher = ManualWatcher::new();

        let outcome = rig
            .scheduler
            .run_tests(suite(&["a", "b", "c", "d"]), &watcher)
            .await;

        match outcome {
            RunOutcome::Completed(summary) => {
                assert_eq!(summary.admitted, 4);
                assert_eq!(summary.succeeded, 3);
                assert_eq!(summary.failed, 1);
            }
            other => panic!("expected Completed, got {other:?}"),
        }

        let failure = rig
            .recorder
            .events()
            .into_iter()
            .find(|e| e.kind == EventKind::TestFileFailure)
            .expect("failure event for b");
        assert_eq!(failure.test.path(), path_of("b"));
        assert!(failure.error.as_ref().is_some_and(|e| !e.is_fatal()));
        assert_eq!(rig.pool.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn pool_fault_stops_admission_and_resolves_fatal() {
        let rig = rig(parallel_cfg(2));
        rig.pool
            .script("a", Script::Fault("worker exceeded retry limit", Duration::from_millis(5)));
        rig.pool.script("b", Script::Pass(Duration::from_millis(500)));
        let watcher = ManualWatcher::new();

        let outcome = rig
            .scheduler
            .run_tests(suite(&["a", "b", "c", "d"]), &watcher)
            .await;

        match &outcome {
            RunOutcome::Fatal(error) => assert!(error.is_fatal()),
            other => panic!("expected Fatal, got {other:?}"),
        }
        assert_eq!(outcome.exit_code(), 1);

        // Only the first two tests fit the gate before the fault surfaced.
        assert_eq!(rig.pool.dispatched(), vec![path_of("a"), path_of("b")]);
        assert_eq!(rig.recorder.starts(), vec![path_of("a"), path_of("b")]);

        // "a" got its failure event; "b" was aborted with the pool.
        assert_eq!(rig.recorder.terminals(), vec![path_of("a")]);
        let fault = &rig.recorder.events()[2];
        assert_eq!(fault.kind, EventKind::TestFileFailure);
        assert!(fault.error.as_ref().is_some_and(ExecError::is_fatal));

        assert_eq!(rig.pool.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn cancellation_stops_admission_but_drains_inflight_dispatches() {
        let rig = rig(parallel_cfg(2));
        rig.pool.script("a", Script::Pass(Duration::from_millis(10)));
        for name in ["b", "c", "d"] {
            rig.pool.script(name, Script::Pass(Duration::from_millis(80)));
        }
        let watcher = Arc::new(ManualWatcher::new());
        rig.scheduler.bus().subscribe(Arc::new(CancelOnTerminal {
            watcher: Arc::clone(&watcher),
        }));

        let outcome = rig
            .scheduler
            .run_tests(suite(&["a", "b", "c", "d"]), watcher.as_ref())
            .await;

        assert!(outcome.is_cancelled());

        // Admission halts at the checkpoint right after the interrupt:
        // "c" and "d" never start, and in-flight "b" still drains to its
        // terminal event.
        assert_eq!(rig.recorder.starts(), vec![path_of("a"), path_of("b")]);
        assert_eq!(rig.recorder.terminals(), vec![path_of("a"), path_of("b")]);
        assert_eq!(rig.pool.dispatched(), vec![path_of("a"), path_of("b")]);

        assert_eq!(rig.pool.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn interrupt_during_terminal_delivery_still_resolves_cancelled() {
        let rig = rig(parallel_cfg(2));
        rig.pool.script("a", Script::Pass(Duration::from_millis(5)));
        rig.pool.script("b", Script::Pass(Duration::from_millis(60)));
        rig.scheduler.bus().subscribe(Arc::new(SlowTerminal));

        let watcher = Arc::new(ManualWatcher::new());
        let trigger = {
            let watcher = Arc::clone(&watcher);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(40)).await;
                watcher.interrupt();
            })
        };

        let outcome = rig
            .scheduler
            .run_tests(suite(&["a", "b"]), watcher.as_ref())
            .await;
        trigger.await.unwrap();

        // The signal fired while "a"'s terminal event was being delivered
        // and "b" completed inside that same window; both dispatches still
        // drain, but completion lost the race.
        assert!(outcome.is_cancelled(), "got {outcome:?}");
        assert_eq!(rig.recorder.starts(), vec![path_of("a"), path_of("b")]);
        assert_eq!(rig.recorder.terminals(), vec![path_of("a"), path_of("b")]);
        assert_eq!(rig.pool.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn pre_interrupted_parallel_run_still_tears_the_pool_down() {
        let rig = rig(parallel_cfg(4));
        let watcher = ManualWatcher::new();
        watcher.interrupt();

        let outcome = rig
            .scheduler
            .run_tests(suite(&["a", "b", "c"]), &watcher)
            .await;

        assert!(outcome.is_cancelled());
        assert!(rig.recorder.events().is_empty());
        assert!(rig.pool.dispatched().is_empty());
        assert_eq!(rig.spawner.spawned.load(Ordering::SeqCst), 1);
        assert_eq!(rig.pool.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn empty_suite_completes_with_zero_counters() {
        let rig = rig(parallel_cfg(2));
        let watcher = ManualWatcher::new();

        let outcome = rig.scheduler.run_tests(Vec::new(), &watcher).await;

        match outcome {
            RunOutcome::Completed(summary) => assert_eq!(summary, RunSummary::default()),
            other => panic!("expected Completed, got {other:?}"),
        }
        assert!(rig.recorder.events().is_empty());
        assert_eq!(rig.pool.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn scheduler_is_reusable_across_runs() {
        let rig = rig(serial_cfg());
        let watcher = ManualWatcher::new();

        let first = rig.scheduler.run_tests(suite(&["a"]), &watcher).await;
        let second = rig.scheduler.run_tests(suite(&["b"]), &watcher).await;

        assert!(first.is_completed());
        assert!(second.is_completed());

        let flow = rig.recorder.flow();
        assert_eq!(flow.len(), 4);
        assert_eq!(flow[2], (EventKind::TestFileStart, path_of("b")));

        // Event ordering carries across runs.
        let seqs: Vec<u64> = rig.recorder.events().iter().map(|e| e.seq).collect();
        assert!(seqs.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn interrupted_watcher_cancels_the_next_run_until_reset() {
        let rig = rig(serial_cfg());
        let watcher = ManualWatcher::new();
        watcher.interrupt();

        let preempted = rig.scheduler.run_tests(suite(&["a"]), &watcher).await;
        assert!(preempted.is_cancelled());

        watcher.reset();
        let clean = rig.scheduler.run_tests(suite(&["a"]), &watcher).await;
        assert!(clean.is_completed());
    }
}
