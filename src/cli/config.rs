use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

const TARGET_FILE: &str = "target.json";

/// Platform connection details remembered between runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub username: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl TargetConfig {
    pub fn new(url: String, api_key: Option<String>, username: Option<String>) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            api_key,
            username,
            added_at: Utc::now(),
        }
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("PRUNE_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("platform-prune")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_target_config_from(dir: &Path) -> anyhow::Result<Option<TargetConfig>> {
    let target_file = dir.join(TARGET_FILE);

    if !target_file.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(target_file)?;
    let config: TargetConfig = serde_json::from_str(&content)?;
    Ok(Some(config))
}

pub fn save_target_config_to(dir: &Path, config: &TargetConfig) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    fs::write(dir.join(TARGET_FILE), content)?;
    Ok(())
}

/// Returns whether a stored target existed
pub fn clear_target_config_in(dir: &Path) -> anyhow::Result<bool> {
    let target_file = dir.join(TARGET_FILE);
    if !target_file.exists() {
        return Ok(false);
    }
    fs::remove_file(target_file)?;
    Ok(true)
}

pub fn load_target_config() -> anyhow::Result<Option<TargetConfig>> {
    load_target_config_from(&get_config_dir()?)
}

pub fn save_target_config(config: &TargetConfig) -> anyhow::Result<()> {
    save_target_config_to(&get_config_dir()?, config)
}

pub fn clear_target_config() -> anyhow::Result<bool> {
    clear_target_config_in(&get_config_dir()?)
}

/// Fill connection settings the environment left unset from the stored target
pub fn apply_target(mut config: AppConfig, target: Option<&TargetConfig>) -> AppConfig {
    if let Some(target) = target {
        if config.platform.base_url.is_none() {
            config.platform.base_url = Some(target.url.clone());
        }
        if config.platform.api_key.is_none() {
            config.platform.api_key = target.api_key.clone();
        }
        if config.platform.username.is_none() {
            config.platform.username = target.username.clone();
        }
    }
    config
}
