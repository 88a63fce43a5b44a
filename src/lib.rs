//! Kernel vulnerability analysis database preparer
//!
//! Checks a kernel tree out at (or just before) a vulnerability fix, optionally
//! prepares its build configuration, and hands the tree to `codeql database
//! create` under a deterministic database name.
//!
//! The crate is organized into functional modules:
//! - **error**: Unified error type hierarchy and exit codes
//! - **models**: Core data structures and types
//! - **config**: Tool settings and their JSON file
//! - **system**: Workspace abstraction over the working tree and host
//! - **kernel**: Git checkout, kconfig preparation, build targets
//! - **orchestrator**: Validation, naming, command construction, execution
//! - **log_collector**: `log` backend with per-run session files

pub mod config;
pub mod error;
pub mod kernel;
pub mod log_collector;
pub mod models;
pub mod orchestrator;
pub mod system;

// Re-export the log crate for macro usage
pub use log;

pub use config::Settings;
pub use error::{AppError, Result};
pub use log_collector::LogCollector;
pub use models::{
    BuildPlan, BuildSelector, BuildTarget, CommandStatus, ExternalCommand, InvocationParams,
    OutputIdentifier, ResolvedRevision, RunOutcome, VersionSelector,
};
pub use orchestrator::{AnalysisPlan, Workflow};
pub use system::{SourceTree, Workspace};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert_eq!(VERSION, "0.1.0");
    }
}
