//! Settings for the external tools the workflow drives.
//!
//! Settings are optional: a missing file yields `Settings::default()`, and
//! every field has a default so partial files are accepted.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

pub use loader::{
    get_global_settings_path, load_or_default, load_settings_from_file, validate_config_path,
};

/// Tool and logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Analysis database builder executable.
    pub codeql_program: String,
    /// Language passed as `--language=`.
    pub language: String,
    /// Build driver used for kconfig steps and traced builds.
    pub make_program: String,
    /// Parallel jobs for the traced build; `0` omits `-j`.
    pub jobs: usize,
    /// Directory for per-run session logs.
    pub logs_dir: Option<PathBuf>,
    /// Extra arguments appended to `codeql database create` before `--overwrite`.
    pub extra_codeql_args: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            codeql_program: "codeql".to_string(),
            language: "cpp".to_string(),
            make_program: "make".to_string(),
            jobs: num_cpus::get(),
            logs_dir: None,
            extra_codeql_args: Vec::new(),
        }
    }
}

impl Settings {
    /// Reject settings that would produce an unusable command.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("codeql_program", &self.codeql_program),
            ("language", &self.language),
            ("make_program", &self.make_program),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "'{}' cannot be empty",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Session log directory: the configured one, or
    /// `~/.local/share/kernel-vulndb/logs`.
    pub fn resolved_logs_dir(&self) -> Option<PathBuf> {
        self.logs_dir.clone().or_else(|| {
            dirs::data_local_dir().map(|dir| dir.join("kernel-vulndb").join("logs"))
        })
    }
}
