//! Settings file loader.

use std::fs;
use std::path::{Path, PathBuf};

use super::Settings;
use crate::error::ConfigError;

/// Get the global settings path: ~/.config/kernel-vulndb/settings.json
pub fn get_global_settings_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        ConfigError::ValidationFailed("Cannot determine config directory".to_string())
    })?;

    Ok(config_dir.join("kernel-vulndb").join("settings.json"))
}

/// Load settings from a JSON file.
pub fn load_settings_from_file(path: &Path) -> Result<Settings, ConfigError> {
    validate_config_path(path)?;

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.display().to_string())
        } else {
            ConfigError::IoError(e)
        }
    })?;

    let settings: Settings = serde_json::from_str(&content)?;
    settings.validate()?;

    Ok(settings)
}

/// Load settings from `explicit`, or from the global path.
///
/// An explicitly named file must exist. A missing global file falls back to
/// defaults.
pub fn load_or_default(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    if let Some(path) = explicit {
        return load_settings_from_file(path);
    }

    let global = match get_global_settings_path() {
        Ok(path) => path,
        Err(e) => {
            log::debug!("[Config] No global settings location: {}", e);
            return Ok(Settings::default());
        }
    };

    match load_settings_from_file(&global) {
        Ok(settings) => {
            log::debug!("[Config] Loaded settings from {}", global.display());
            Ok(settings)
        }
        Err(ConfigError::FileNotFound(_)) => Ok(Settings::default()),
        Err(e) => Err(e),
    }
}

/// Validate settings path (.json extension required).
pub fn validate_config_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationFailed(
            "Settings path cannot be empty".to_string(),
        ));
    }

    match path.extension() {
        Some(ext) if ext == "json" => Ok(()),
        Some(ext) => Err(ConfigError::ValidationFailed(format!(
            "Settings file must have .json extension, got .{}",
            ext.to_string_lossy()
        ))),
        None => Err(ConfigError::ValidationFailed(
            "Settings file must have .json extension".to_string(),
        )),
    }
}
