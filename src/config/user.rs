use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Features, PackageManager};
use crate::error::{Result, StarterError};

/// User-level configuration loaded from `~/.config/ts-starter/config.toml`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub template: TemplateOverrides,

    #[serde(default)]
    pub defaults: UserDefaults,
}

/// Alternative template location, e.g. a fork of the starter.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TemplateOverrides {
    pub repository: Option<String>,
    pub branch: Option<String>,
}

/// Defaults applied to command-line flags that were not passed.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct UserDefaults {
    pub description: Option<String>,
    pub package_manager: Option<PackageManager>,
    pub features: Option<Features>,
}

/// Get the path to the user config file.
fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ts-starter").join("config.toml"))
}

/// Load user configuration from the XDG config directory.
///
/// Returns `Ok(None)` if the config file does not exist.
/// Returns `Err` if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<Option<UserConfig>> {
    match config_path() {
        Some(path) => load_user_config_from(&path),
        None => Ok(None),
    }
}

pub fn load_user_config_from(path: &Path) -> Result<Option<UserConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| StarterError::Io {
        context: format!("reading user config {}", path.display()),
        source: e,
    })?;

    let config: UserConfig = toml::from_str(&content).map_err(|e| StarterError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(Some(config))
}
