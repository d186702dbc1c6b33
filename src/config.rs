use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Where the progress record and the log file live.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Shuffle the build-citation segment pool. Off keeps catalog order.
    #[serde(default = "default_shuffle_segments")]
    pub shuffle_segments: bool,
}

fn default_theme() -> String {
    "chambers".to_string()
}
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("citedr")
}
fn default_shuffle_segments() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            data_dir: default_data_dir(),
            shuffle_segments: default_shuffle_segments(),
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
            .join("citedr")
            .join("config.toml")
    }

    /// Reset an unknown theme name to the default. Returns true if anything changed.
    pub fn validate(&mut self, valid_themes: &[&str]) -> bool {
        if valid_themes.contains(&self.theme.as_str()) {
            return false;
        }
        tracing::warn!(theme = %self.theme, "unknown theme, using default");
        self.theme = default_theme();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "chambers");
        assert!(config.shuffle_segments);
        assert!(config.data_dir.ends_with("citedr"));
    }

    #[test]
    fn test_config_partial_file_keeps_defaults() {
        let toml_str = r#"
theme = "ledger"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "ledger");
        assert!(config.shuffle_segments);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            theme: "ledger".to_string(),
            data_dir: PathBuf::from("/tmp/citedr-test"),
            shuffle_segments: false,
        };
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_validate_keeps_known_theme() {
        let mut config = Config::default();
        config.theme = "ledger".to_string();
        assert!(!config.validate(&["chambers", "ledger"]));
        assert_eq!(config.theme, "ledger");
    }

    #[test]
    fn test_validate_resets_unknown_theme() {
        let mut config = Config::default();
        config.theme = "neon".to_string();
        assert!(config.validate(&["chambers", "ledger"]));
        assert_eq!(config.theme, "chambers");
    }
}
