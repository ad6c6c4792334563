//! # Per-execution identity.
//!
//! Worker ids let test environments namespace shared resources (databases,
//! temp dirs, ports) per concurrent executor. Pools assign ids to their
//! worker processes; in-band execution is always worker 1, matching what a
//! pool with a single worker would assign.

/// Identity handed to one test-file execution.
///
/// Passed by value through [`ExecuteFile::execute`]; pool implementations
/// build the equivalent for their worker processes.
///
/// [`ExecuteFile::execute`]: crate::ExecuteFile::execute
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecContext {
    /// 1-based executor slot id.
    pub worker_id: usize,
}

impl ExecContext {
    /// Context for in-band execution (worker id 1).
    #[inline]
    pub fn in_band() -> Self {
        Self { worker_id: 1 }
    }

    /// Context for an explicit worker slot.
    #[inline]
    pub fn for_worker(worker_id: usize) -> Self {
        Self { worker_id }
    }
}
