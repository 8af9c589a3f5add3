use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_deck")]
    pub deck: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_timer_secs")]
    pub timer_secs: u64,
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
    #[serde(default = "default_srs_enabled")]
    pub srs_enabled: bool,
    #[serde(default = "default_analytics_enabled")]
    pub analytics_enabled: bool,
    /// Base URL of a deck server; when set (and the `network` feature is
    /// compiled in) decks are fetched from it instead of the bundled set.
    #[serde(default)]
    pub remote_base_url: Option<String>,
}

fn default_deck() -> String {
    "french-core".to_string()
}
fn default_theme() -> String {
    "slate".to_string()
}
fn default_timer_secs() -> u64 {
    20
}
fn default_shuffle() -> bool {
    true
}
fn default_srs_enabled() -> bool {
    true
}
fn default_analytics_enabled() -> bool {
    false
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deck: default_deck(),
            theme: default_theme(),
            timer_secs: default_timer_secs(),
            shuffle: default_shuffle(),
            srs_enabled: default_srs_enabled(),
            analytics_enabled: default_analytics_enabled(),
            remote_base_url: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocadr")
            .join("config.toml")
    }

    pub fn turn_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timer_secs.max(1))
    }

    /// Clamp to a sane deck name if the configured one no longer exists
    /// (renamed or deleted user deck).
    pub fn normalize_deck(&mut self, available: &[String]) {
        if !available.is_empty() && !available.iter().any(|d| d == &self.deck) {
            self.deck = available[0].clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.deck, "french-core");
        assert_eq!(config.timer_secs, 20);
        assert!(config.shuffle);
        assert!(config.remote_base_url.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("timer_secs = 15").unwrap();
        assert_eq!(config.timer_secs, 15);
        assert_eq!(config.deck, "french-core");
    }

    #[test]
    fn test_turn_duration_floor() {
        let config: Config = toml::from_str("timer_secs = 0").unwrap();
        assert_eq!(config.turn_duration(), std::time::Duration::from_secs(1));
    }

    #[test]
    fn test_normalize_deck() {
        let mut config = Config::default();
        config.deck = "deleted-deck".to_string();
        config.normalize_deck(&["spanish-basics".to_string()]);
        assert_eq!(config.deck, "spanish-basics");
    }
}
