use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/skillswap.json";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Durable client state: server location, auth token, theme preference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub dark_mode: bool,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            token: None,
            dark_mode: false,
        }
    }
}

impl AppConfig {
    /// WebSocket base derived from the REST base (`http` → `ws`).
    pub fn ws_url(&self) -> String {
        let base = self
            .server_url
            .replacen("https://", "wss://", 1)
            .replacen("http://", "ws://", 1);
        format!("{}/ws", base.trim_end_matches('/'))
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn save_config(path: &str, config: &AppConfig) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}

pub fn persist_token(path: &str, token: Option<&str>) {
    let mut config = load_config(path);
    config.token = token.map(|t| t.to_string());

    if let Err(err) = save_config(path, &config) {
        log::error!("Failed to write config {path}: {err}");
    }
}

pub fn persist_dark_mode(path: &str, dark_mode: bool) {
    let mut config = load_config(path);
    config.dark_mode = dark_mode;

    if let Err(err) = save_config(path, &config) {
        log::error!("Failed to write config {path}: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_url_is_derived_from_server_url() {
        let config = AppConfig {
            server_url: "http://127.0.0.1:8000".into(),
            ..AppConfig::default()
        };
        assert_eq!(config.ws_url(), "ws://127.0.0.1:8000/ws");

        let config = AppConfig {
            server_url: "https://skillswap.example/".into(),
            ..AppConfig::default()
        };
        assert_eq!(config.ws_url(), "wss://skillswap.example/ws");
    }
}
