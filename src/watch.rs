//! # Watch-mode interruption plumbing.
//!
//! The host's watcher owns interruption state: file-change handlers flip it
//! when a new run should preempt the current one. This module defines the
//! read side the scheduler consumes ([`Watcher`]), a flippable
//! implementation for hosts and tests ([`ManualWatcher`]), and the internal
//! bridge that turns "watcher became interrupted" into a one-shot
//! [`CancellationToken`] for one run.
//!
//! ## Rules
//! - The token fires at most once per run and never un-fires.
//! - Interruption only stops *admission*; test code that is already running
//!   is never killed because of a watch signal.
//! - Each run derives its own token; a watcher that stays interrupted makes
//!   the next run resolve `Cancelled` immediately, which is the host's cue
//!   to reset state before scheduling again.

use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Snapshot pushed on a watcher's change stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WatchNotice {
    /// Whether the watcher considers the current run preempted.
    pub interrupted: bool,
}

/// # Read side of a watch session.
///
/// The scheduler polls [`is_interrupted`](Watcher::is_interrupted) at
/// admission checkpoints and listens on [`changes`](Watcher::changes) to
/// observe a flip mid-run without polling in a loop.
///
/// # Example
/// ```
/// use testvisor::{ManualWatcher, Watcher};
///
/// let watcher = ManualWatcher::new();
/// assert!(!watcher.is_interrupted());
///
/// watcher.interrupt();
/// assert!(watcher.is_interrupted());
/// ```
pub trait Watcher: Send + Sync + 'static {
    /// Current interruption state.
    fn is_interrupted(&self) -> bool;

    /// New receiver observing subsequent change notices.
    ///
    /// Each call creates an independent receiver; notices sent before the
    /// call are not replayed.
    fn changes(&self) -> watch::Receiver<WatchNotice>;
}

/// Flippable [`Watcher`] backed by an atomic flag and a watch channel.
///
/// Hosts wire their file-system watcher (or Ctrl-C handler) to
/// [`interrupt`](ManualWatcher::interrupt); tests use it to script
/// cancellation points.
pub struct ManualWatcher {
    interrupted: AtomicBool,
    tx: watch::Sender<WatchNotice>,
}

impl ManualWatcher {
    /// Creates a watcher in the non-interrupted state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(WatchNotice::default());
        Self {
            interrupted: AtomicBool::new(false),
            tx,
        }
    }

    /// Marks the current run as preempted and notifies listeners.
    ///
    /// Idempotent; the flag never flips back on its own.
    pub fn interrupt(&self) {
        self.interrupted.store(true, AtomicOrdering::SeqCst);
        let _ = self.tx.send(WatchNotice { interrupted: true });
    }

    /// Clears the interrupted state for the next run.
    pub fn reset(&self) {
        self.interrupted.store(false, AtomicOrdering::SeqCst);
        let _ = self.tx.send(WatchNotice::default());
    }
}

impl Default for ManualWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Watcher for ManualWatcher {
    fn is_interrupted(&self) -> bool {
        self.interrupted.load(AtomicOrdering::SeqCst)
    }

    fn changes(&self) -> watch::Receiver<WatchNotice> {
        self.tx.subscribe()
    }
}

/// One run's cancellation source, derived from the watcher at run start.
///
/// If the watcher is already interrupted the token comes back pre-fired;
/// otherwise a forwarder task cancels it on the first interrupted notice.
/// Dropping the signal aborts the forwarder, so nothing outlives the run.
pub(crate) struct CancelSignal {
    token: CancellationToken,
    forwarder: Option<JoinHandle<()>>,
}

impl CancelSignal {
    /// Must be called within a Tokio runtime.
    pub(crate) fn derive(watcher: &dyn Watcher) -> Self {
        let token = CancellationToken::new();
        if watcher.is_interrupted() {
            token.cancel();
            return Self {
                token,
                forwarder: None,
            };
        }

        let mut rx = watcher.changes();
        let fwd = token.clone();
        let forwarder = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                if rx.borrow().interrupted {
                    fwd.cancel();
                    break;
                }
            }
        });

        Self {
            token,
            forwarder: Some(forwarder),
        }
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for CancelSignal {
    fn drop(&mut self) {
        if let Some(handle) = self.forwarder.take() {
            handle.abort();
        }
    }
}
