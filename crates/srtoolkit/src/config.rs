use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::settings::Language;

pub const CONFIG_FILENAME: &str = "srtoolkit.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    /// How long a worker lookup may stay pending before it is released.
    pub worker_timeout_ms: u64,
    pub context_menu: ContextMenuConfig,
    /// Extension page hosting the options and text-replacement views.
    pub option_page: String,
    /// Help sub-path opened when the speech permission is missing.
    pub permissions_sub_path: String,
    /// Language written to the store when none is set yet.
    pub default_language: Language,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextMenuConfig {
    pub id: String,
    pub start_title: String,
    pub stop_title: String,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            worker_timeout_ms: 10_000,
            context_menu: ContextMenuConfig::default(),
            option_page: "option.html".to_string(),
            permissions_sub_path: "permissions".to_string(),
            default_language: Language {
                code: "en".to_string(),
                label: "English".to_string(),
            },
        }
    }
}

impl Default for ContextMenuConfig {
    fn default() -> Self {
        Self {
            id: "startStopSRContextMenu".to_string(),
            start_title: "Start Speech Recognition Toolkit".to_string(),
            stop_title: "Stop Speech Recognition Toolkit".to_string(),
        }
    }
}

impl ToolkitConfig {
    pub fn worker_timeout(&self) -> Duration {
        Duration::from_millis(self.worker_timeout_ms)
    }
}

pub fn load_or_create_config(dir: &Path) -> CoreResult<ToolkitConfig> {
    std::fs::create_dir_all(dir).map_err(|error| {
        CoreError::Config(format!(
            "failed to create config directory {}: {error}",
            dir.display()
        ))
    })?;

    let path = config_path(dir);
    if !path.exists() {
        let config = ToolkitConfig::default();
        write_config(&path, &config)?;
        return Ok(config);
    }

    let data = std::fs::read_to_string(&path).map_err(|error| {
        CoreError::Config(format!("failed to read config {}: {error}", path.display()))
    })?;
    let config: ToolkitConfig = serde_json::from_str(&data).map_err(|error| {
        CoreError::Config(format!("failed to parse config {}: {error}", path.display()))
    })?;
    if config.worker_timeout_ms == 0 {
        return Err(CoreError::Config(
            "worker_timeout_ms must be greater than zero".to_string(),
        ));
    }
    Ok(config)
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILENAME)
}

fn write_config(path: &Path, config: &ToolkitConfig) -> CoreResult<()> {
    let data = serde_json::to_string_pretty(config).map_err(|error| {
        CoreError::Internal(format!(
            "failed to serialize config {}: {error}",
            path.display()
        ))
    })?;
    std::fs::write(path, data).map_err(|error| {
        CoreError::Internal(format!("failed to write config {}: {error}", path.display()))
    })?;
    Ok(())
}
