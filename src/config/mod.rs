use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub platform: PlatformConfig,
    pub defaults: RunDefaults,
}

/// Where the platform lives and how to authenticate against it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub username: Option<String>,
    pub request_timeout_secs: u64,
}

/// Flag defaults for runs, overridable per invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RunDefaults {
    pub teams_disabled: bool,
    pub openshift_online: bool,
    pub openshift_token: Option<String>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            username: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply `PRUNE_*` settings from any key lookup. Unparseable values keep
    /// the current setting.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Platform overrides
        if let Some(v) = non_empty("PRUNE_PLATFORM_URL") {
            self.platform.base_url = Some(v.trim_end_matches('/').to_string());
        }
        if let Some(v) = non_empty("PRUNE_API_KEY") {
            self.platform.api_key = Some(v);
        }
        if let Some(v) = non_empty("PRUNE_USERNAME") {
            self.platform.username = Some(v);
        }
        if let Some(v) = non_empty("PRUNE_REQUEST_TIMEOUT_SECS") {
            self.platform.request_timeout_secs = v.parse().unwrap_or(self.platform.request_timeout_secs);
        }

        // Run defaults
        if let Some(v) = non_empty("PRUNE_TEAMS_DISABLED") {
            self.defaults.teams_disabled = parse_flag(&v).unwrap_or(self.defaults.teams_disabled);
        }
        if let Some(v) = non_empty("PRUNE_OPENSHIFT_ONLINE") {
            self.defaults.openshift_online = parse_flag(&v).unwrap_or(self.defaults.openshift_online);
        }
        if let Some(v) = non_empty("PRUNE_OPENSHIFT_TOKEN") {
            self.defaults.openshift_token = Some(v);
        }

        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
