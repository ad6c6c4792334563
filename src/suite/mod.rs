//! # Test-suite descriptors and results.
//!
//! This module provides the data types that flow through a run:
//! - [`TestFile`] - one discovered test file with its project context
//! - [`ProjectConfig`] - resolved per-project settings, forwarded opaquely
//! - [`ResolverHandle`] - opaque module-resolution handle, forwarded opaquely
//! - [`TestResult`] - outcome counters produced by executing one file

mod result;
mod test_file;

pub use result::TestResult;
pub use test_file::{ProjectConfig, ResolverHandle, TestFile};
