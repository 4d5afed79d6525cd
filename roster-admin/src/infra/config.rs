use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domains::auth::storage::FileStore;

pub const SERVER_URL_ENV: &str = "ROSTER_SERVER_URL";
pub const TOKEN_STORE_ENV: &str = "ROSTER_TOKEN_STORE";

const APP_DIR: &str = "roster-admin";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    pub request_timeout_secs: u64,
    /// Location of the durable token store; platform data dir when unset
    pub token_store_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 30,
            token_store_path: None,
        }
    }
}

impl Config {
    /// `<config_dir>/roster-admin/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Defaults, then the config file, then the environment.
    pub fn load() -> Self {
        let mut config = Self::load_from(Self::default_path().as_deref());
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Defaults overlaid with `path` when it exists and parses
    pub fn load_from(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Config>(&content) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!(
                        "[Config] Ignoring unparsable config at {}: {}",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!(
                    "[Config] Failed to read config at {}: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(server_url) = lookup(SERVER_URL_ENV)
            .filter(|value| !value.trim().is_empty())
        {
            self.server_url = server_url;
        }
        if let Some(path) =
            lookup(TOKEN_STORE_ENV).filter(|value| !value.trim().is_empty())
        {
            self.token_store_path = Some(PathBuf::from(path));
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn resolved_token_store_path(&self) -> anyhow::Result<PathBuf> {
        match &self.token_store_path {
            Some(path) => Ok(path.clone()),
            None => Ok(FileStore::default_path()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(Some(&temp_dir.path().join("absent.json")));
        assert_eq!(config, Config::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn file_values_fill_gaps_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"server_url":"https://roster.example.com"}"#)
            .unwrap();

        let config = Config::load_from(Some(&path));
        assert_eq!(config.server_url, "https://roster.example.com");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.token_store_path, None);
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "server_url = nope").unwrap();

        assert_eq!(Config::load_from(Some(&path)), Config::default());
    }

    #[test]
    fn environment_overrides_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            (SERVER_URL_ENV, "http://10.0.0.5:9000"),
            (TOKEN_STORE_ENV, "/tmp/roster/session.json"),
        ]);
        let mut config = Config {
            server_url: "http://from-file".into(),
            ..Config::default()
        };
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server_url, "http://10.0.0.5:9000");
        assert_eq!(
            config.resolved_token_store_path().unwrap(),
            PathBuf::from("/tmp/roster/session.json")
        );
    }

    #[test]
    fn blank_environment_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env_overrides(|_| Some("  ".to_string()));
        assert_eq!(config, Config::default());
    }
}
