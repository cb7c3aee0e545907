use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{BotError, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Bot API credential
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Server-side wait bound for a single getUpdates call
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
    /// Pause between two polls
    #[serde(default = "default_idle_interval_ms")]
    pub idle_interval_ms: u64,
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout_secs() -> u64 {
    100
}

fn default_idle_interval_ms() -> u64 {
    1000
}

fn default_database_path() -> PathBuf {
    PathBuf::from("data/chat_state.db")
}

pub(crate) fn default_log_directory() -> PathBuf {
    PathBuf::from("log")
}

impl Config {
    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(BotError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            BotError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        if content.trim().is_empty() {
            return Err(BotError::Config(format!(
                "config file is empty: {}",
                path.display()
            )));
        }

        let is_toml = path.extension().is_some_and(|ext| ext == "toml");
        let config: Config = if is_toml {
            toml::from_str(content).map_err(|e| {
                BotError::Config(format!("failed to parse {}: {}", path.display(), e))
            })?
        } else {
            serde_json::from_str(content).map_err(|e| {
                BotError::Config(format!("failed to parse {}: {}", path.display(), e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(BotError::Config("no token".to_string()));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(BotError::Config("api_base_url must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(name: &str, content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let (_dir, path) = write_config("conf.json", r#"{"token": "123:abc"}"#);
        let config = Config::load(&path).unwrap();

        assert_eq!(config.token, "123:abc");
        assert_eq!(config.api_base_url, "https://api.telegram.org");
        assert_eq!(config.poll_timeout_secs, 100);
        assert_eq!(config.idle_interval(), Duration::from_secs(1));
        assert_eq!(config.database_path, PathBuf::from("data/chat_state.db"));
        assert_eq!(config.log_directory, PathBuf::from("log"));
    }

    #[test]
    fn test_overrides_are_read() {
        let (_dir, path) = write_config(
            "conf.json",
            r#"{"token": "t", "poll_timeout_secs": 30, "idle_interval_ms": 250,
                "database_path": "/var/lib/bot/state.db"}"#,
        );
        let config = Config::load(&path).unwrap();

        assert_eq!(config.poll_timeout_secs, 30);
        assert_eq!(config.idle_interval(), Duration::from_millis(250));
        assert_eq!(config.database_path, PathBuf::from("/var/lib/bot/state.db"));
    }

    #[test]
    fn test_toml_extension_parses_as_toml() {
        let (_dir, path) = write_config("bot.toml", "token = \"t\"\nlog_directory = \"logs\"\n");
        let config = Config::load(&path).unwrap();

        assert_eq!(config.token, "t");
        assert_eq!(config.log_directory, PathBuf::from("logs"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, BotError::Config(ref m) if m.contains("not found")));
    }

    #[test]
    fn test_empty_file_is_config_error() {
        let (_dir, path) = write_config("conf.json", "  \n");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, BotError::Config(ref m) if m.contains("empty")));
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let (_dir, path) = write_config("conf.json", r#"{"poll_timeout_secs": 10}"#);
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, BotError::Config(ref m) if m == "no token"));
    }

    #[test]
    fn test_empty_token_is_config_error() {
        let (_dir, path) = write_config("conf.json", r#"{"token": ""}"#);
        assert!(matches!(
            Config::load(&path).unwrap_err(),
            BotError::Config(_)
        ));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let (_dir, path) = write_config("conf.json", "{token: ");
        assert!(matches!(
            Config::load(&path).unwrap_err(),
            BotError::Config(ref m) if m.contains("failed to parse")
        ));
    }
}
