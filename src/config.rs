//! Configuration loaded from ~/.visitsync/config.json.
//!
//! Every field has a default, so a missing or malformed file degrades to
//! defaults with a warning instead of failing startup. `VISITSYNC_BASE_URL`
//! overrides the configured backend URL.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

const CONFIG_FILE: &str = "config.json";
const BASE_URL_ENV: &str = "VISITSYNC_BASE_URL";

fn default_poll_interval_ms() -> u64 {
    5_000
}

fn default_notes_debounce_ms() -> u64 {
    400
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Backend origin, e.g. "http://localhost:8000". None means no backend
    /// is configured (the demo binary falls back to the mock backend).
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_notes_debounce_ms")]
    pub notes_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            poll_interval_ms: default_poll_interval_ms(),
            notes_debounce_ms: default_notes_debounce_ms(),
        }
    }
}

impl Config {
    /// Load from disk, falling back to defaults, then apply env overrides.
    pub fn load() -> Self {
        let mut config = match state_dir().map(|dir| dir.join(CONFIG_FILE)) {
            Some(path) if path.exists() => match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    log::warn!("Malformed config at {}: {e}; using defaults", path.display());
                    Config::default()
                }),
                Err(e) => {
                    log::warn!("Could not read config at {}: {e}; using defaults", path.display());
                    Config::default()
                }
            },
            _ => Config::default(),
        };

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                config.base_url = Some(base_url.trim().to_string());
            }
        }

        config
    }

    /// Parsed backend URL, if one is configured and valid.
    pub fn backend_url(&self) -> Option<Url> {
        let raw = self.base_url.as_deref()?;
        match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!("Invalid base URL {raw:?}: {e}");
                None
            }
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn notes_debounce(&self) -> Duration {
        Duration::from_millis(self.notes_debounce_ms)
    }
}

/// The state directory (~/.visitsync), also used for notes storage.
pub fn state_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".visitsync"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(5_000));
        assert_eq!(config.notes_debounce(), Duration::from_millis(400));
        assert!(config.backend_url().is_none());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"baseUrl": "http://localhost:8000"}"#).unwrap();
        assert_eq!(config.poll_interval_ms, 5_000);
        assert_eq!(
            config.backend_url().unwrap().as_str(),
            "http://localhost:8000/"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = Config {
            base_url: Some("not a url".to_string()),
            ..Config::default()
        };
        assert!(config.backend_url().is_none());
    }
}
