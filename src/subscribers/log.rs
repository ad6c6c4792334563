//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [start] test=web/login.test.js
//! [pass] test=web/login.test.js passed=12 failed=0 skipped=1 duration=1.2s
//! [fail] test=web/cart.test.js err="test run failed: 2 assertions failed"
//! ```
//!
//! ## Example
//! ```no_run
//! # use testvisor::LogWriter;
//! # use std::sync::Arc;
//! let writer: Arc<dyn testvisor::Subscribe> = Arc::new(LogWriter);
//! // Register through SchedulerBuilder::with_subscribers to print all events.
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event descriptions
/// to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// real reporter integration.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::TestFileStart => {
                println!("[start] test={}", e.test.path().display());
            }
            EventKind::TestFileSuccess => {
                if let Some(result) = &e.result {
                    println!(
                        "[pass] test={} passed={} failed={} skipped={} duration={:?}",
                        e.test.path().display(),
                        result.passed,
                        result.failed,
                        result.skipped,
                        result.duration
                    );
                }
            }
            EventKind::TestFileFailure => {
                let err = e.error.as_ref().map(ToString::to_string).unwrap_or_default();
                println!("[fail] test={} err={:?}", e.test.path().display(), err);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
