//! Unified error type hierarchy.
//!
//! Provides UsageError, EnvironmentError, ConfigError, KconfigError and
//! OperationError, aggregated by AppError which knows the process exit code
//! each failure maps to.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::kernel::git::GitError;
use crate::models::CommandStatus;

/// Bad command-line input. Always detected before anything is mutated.
#[derive(Error, Debug)]
pub enum UsageError {
    #[error("Expected 6 or 7 arguments, got {0}")]
    ArgumentCount(usize),

    #[error("Invalid version selector '{0}': expected 1 (before fix) or 2 (after fix)")]
    InvalidVersionSelector(String),

    #[error("Invalid build selector '{0}': expected 1 (build) or 2 (no build)")]
    InvalidBuildSelector(String),

    #[error("Build mode requires a configuration option name (e.g. CONFIG_ATM)")]
    MissingBuildOption,
}

/// Settings file loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Settings file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid JSON in settings: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Settings validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error during settings operations: {0}")]
    IoError(#[from] io::Error),
}

/// The host is missing something the workflow needs.
#[derive(Error, Debug)]
pub enum EnvironmentError {
    #[error("Analysis tool '{0}' not found on PATH")]
    ToolNotFound(String),

    #[error("Source tree unavailable: {0}")]
    SourceTree(String),

    #[error("Cannot resolve output base path {0}")]
    OutputBase(String),

    #[error(transparent)]
    Settings(#[from] ConfigError),
}

/// Kernel build preparation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepStep {
    Mrproper,
    Defconfig,
    EnableOption,
}

impl std::fmt::Display for PrepStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrepStep::Mrproper => write!(f, "mrproper"),
            PrepStep::Defconfig => write!(f, "defconfig"),
            PrepStep::EnableOption => write!(f, "enable option"),
        }
    }
}

/// Build configuration (kconfig) step failures.
#[derive(Error, Debug)]
pub enum KconfigError {
    #[error("Build preparation step '{step}' failed with {status}")]
    StepFailed { step: PrepStep, status: CommandStatus },

    #[error("Could not start build preparation step '{step}': {source}")]
    Spawn {
        step: PrepStep,
        #[source]
        source: io::Error,
    },
}

/// Failures of a mutating or executing step once validation has passed.
#[derive(Error, Debug)]
pub enum OperationError {
    #[error("Checkout failed: {0}")]
    Checkout(#[from] GitError),

    #[error(transparent)]
    Preparation(#[from] KconfigError),

    #[error("Target directory not found in source tree: {}", .0.display())]
    TargetDirectoryNotFound(PathBuf),

    #[error("Could not start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Top-level error for the workflow.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

impl AppError {
    /// Get a user-facing error message suitable for the terminal
    pub fn user_message(&self) -> String {
        match self {
            AppError::Usage(e) => format!("Usage error: {}", e),
            AppError::Environment(e) => format!("Environment error: {}", e),
            AppError::Operation(e) => format!("Aborted: {}", e),
        }
    }

    /// Process exit status for this failure.
    ///
    /// A failed preparation step hands back the exit code of the process that
    /// failed; everything else is `1`.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Operation(OperationError::Preparation(KconfigError::StepFailed {
                status,
                ..
            })) => status.exit_code(),
            _ => 1,
        }
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, AppError::Usage(_))
    }
}

impl From<GitError> for AppError {
    fn from(e: GitError) -> Self {
        AppError::Operation(OperationError::Checkout(e))
    }
}

impl From<KconfigError> for AppError {
    fn from(e: KconfigError) -> Self {
        AppError::Operation(OperationError::Preparation(e))
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Environment(EnvironmentError::Settings(e))
    }
}

/// Result type for workflow operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_error_display() {
        let err = UsageError::ArgumentCount(3);
        assert_eq!(err.to_string(), "Expected 6 or 7 arguments, got 3");
    }

    #[test]
    fn test_usage_and_environment_errors_exit_one() {
        assert_eq!(AppError::from(UsageError::MissingBuildOption).exit_code(), 1);
        assert_eq!(
            AppError::from(EnvironmentError::ToolNotFound("codeql".to_string())).exit_code(),
            1
        );
        assert_eq!(
            AppError::from(OperationError::TargetDirectoryNotFound(PathBuf::from("/x"))).exit_code(),
            1
        );
    }

    #[test]
    fn test_failed_preparation_step_propagates_status() {
        let err = AppError::from(KconfigError::StepFailed {
            step: PrepStep::Defconfig,
            status: CommandStatus::from_code(2),
        });
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("defconfig"));
    }

    #[test]
    fn test_user_message_prefixes() {
        let err = AppError::from(UsageError::InvalidBuildSelector("x".to_string()));
        assert!(err.user_message().starts_with("Usage error:"));
        assert!(err.is_usage());
    }
}
