//! # Test-file descriptors produced by discovery.
//!
//! Defines [`TestFile`], the unit of scheduling, plus the two pieces of
//! context it carries: [`ProjectConfig`] and [`ResolverHandle`].
//!
//! ## Rules
//! - The scheduler never interprets project config or resolver content;
//!   both travel untouched from discovery to the execution seam.
//! - Descriptors are immutable once built.

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Resolved configuration of the project a test file belongs to.
///
/// Built by discovery, consumed by executors and reporters. The scheduler
/// only moves it around.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Display name used in logs and reporter output.
    pub name: String,
    /// Root directory of the project.
    pub root: PathBuf,
}

impl ProjectConfig {
    /// Creates a project config.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }
}

/// Opaque handle to the module-resolution state for a project.
///
/// Executors use it to locate modules for the file under test; the
/// scheduler never looks inside.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverHandle(Arc<str>);

impl ResolverHandle {
    /// Wraps a resolver key.
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// Returns the resolver key.
    pub fn key(&self) -> &str {
        &self.0
    }
}

/// One discovered test file, the unit the scheduler admits and dispatches.
///
/// Bundles together:
/// - The file path
/// - The owning project's [`ProjectConfig`]
/// - The project's [`ResolverHandle`]
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use testvisor::{ProjectConfig, ResolverHandle, TestFile};
///
/// let project = Arc::new(ProjectConfig::new("web", "/repo/web"));
/// let test = TestFile::new(
///     "/repo/web/login.test.js",
///     Arc::clone(&project),
///     ResolverHandle::new("web-resolver"),
/// );
/// assert_eq!(test.project().name, "web");
/// assert!(test.path().ends_with("login.test.js"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestFile {
    path: PathBuf,
    project: Arc<ProjectConfig>,
    resolver: ResolverHandle,
}

impl TestFile {
    /// Creates a test-file descriptor.
    ///
    /// ### Parameters
    /// - `path`: Absolute path of the file under test
    /// - `project`: Owning project's resolved configuration
    /// - `resolver`: Module-resolution handle for that project
    pub fn new(
        path: impl Into<PathBuf>,
        project: Arc<ProjectConfig>,
        resolver: ResolverHandle,
    ) -> Self {
        Self {
            path: path.into(),
            project,
            resolver,
        }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the owning project's configuration.
    pub fn project(&self) -> &Arc<ProjectConfig> {
        &self.project
    }

    /// Returns the resolver handle.
    pub fn resolver(&self) -> &ResolverHandle {
        &self.resolver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_carries_context_untouched() {
        let project = Arc::new(ProjectConfig::new("api", "/repo/api"));
        let resolver = ResolverHandle::new("api-resolver");
        let test = TestFile::new("/repo/api/auth.test.js", project, resolver.clone());

        assert_eq!(test.path(), Path::new("/repo/api/auth.test.js"));
        assert_eq!(test.project().root, PathBuf::from("/repo/api"));
        assert_eq!(test.resolver(), &resolver);
        assert_eq!(test.resolver().key(), "api-resolver");
    }

    #[test]
    fn clones_share_the_project_config() {
        let project = Arc::new(ProjectConfig::new("api", "/repo/api"));
        let a = TestFile::new(
            "/repo/api/a.test.js",
            Arc::clone(&project),
            ResolverHandle::new("r"),
        );
        let b = a.clone();
        assert!(Arc::ptr_eq(a.project(), b.project()));
    }
}
