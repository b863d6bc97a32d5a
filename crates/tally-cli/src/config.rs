use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub default_book: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://api.tally.tools".into(),
            api_key: String::new(),
            default_book: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Resolve the config file path: explicit flag, then `$TALLY_CONFIG`,
    /// then `~/.config/tally/config.toml`.
    pub fn resolve_path(explicit: Option<&str>) -> PathBuf {
        if let Some(path) = explicit {
            return PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("TALLY_CONFIG") {
            return PathBuf::from(path);
        }
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        PathBuf::from(home).join(".config").join("tally").join("config.toml")
    }

    /// Load the config, falling back to defaults when the file is absent.
    pub fn load(path: &PathBuf) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config at {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("parsing config at {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "base_url" => Some(self.base_url.clone()),
            "api_key" => Some(self.api_key.clone()),
            "default_book" => self.default_book.clone(),
            "timeout_secs" => Some(self.timeout_secs.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "base_url" => self.base_url = value.into(),
            "api_key" => self.api_key = value.into(),
            "default_book" => self.default_book = Some(value.into()),
            "timeout_secs" => {
                self.timeout_secs = value.parse().context("timeout_secs must be an integer")?;
            }
            other => anyhow::bail!("unknown config key: {other}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_absent() {
        let path = PathBuf::from("/nonexistent/tally/config.toml");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.set("api_key", "secret").unwrap();
        config.set("default_book", "b1").unwrap();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.api_key, "secret");
        assert_eq!(loaded.default_book, Some("b1".into()));
    }

    #[test]
    fn unknown_key_rejected() {
        let mut config = Config::default();
        assert!(config.set("color", "always").is_err());
    }

    #[test]
    fn explicit_path_wins() {
        let path = Config::resolve_path(Some("/tmp/custom.toml"));
        assert_eq!(path, PathBuf::from("/tmp/custom.toml"));
    }
}
