//! Configuration - TOML Generator Settings
//!
//! Every field has a default, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::assets::AssetLayout;
use crate::layout::{CodeStyle, Placement};
use crate::payload::DEFAULT_EVENT_LABEL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub max_workers: usize,
    /// Per-registrant limit; unset means no limit.
    pub timeout_secs: Option<u64>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            timeout_secs: None,
        }
    }
}

impl BatchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub assets_dir: PathBuf,
    pub output_dir: PathBuf,
    pub event_label: String,
    /// Enables HMAC signatures on generation reports.
    pub signing_secret: Option<String>,
    pub layout: AssetLayout,
    pub style: CodeStyle,
    pub placement: Placement,
    pub batch: BatchConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("images"),
            output_dir: PathBuf::from("generated_passes"),
            event_label: DEFAULT_EVENT_LABEL.to_string(),
            signing_secret: None,
            layout: AssetLayout::default(),
            style: CodeStyle::default(),
            placement: Placement::default(),
            batch: BatchConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a TOML file.
    ///
    /// Relative asset and output directories are resolved against the
    /// directory holding the file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        if let Some(base) = path.parent() {
            config.assets_dir = base.join(&config.assets_dir);
            config.output_dir = base.join(&config.output_dir);
        }
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::EcLevel;

    #[test]
    fn test_empty_config_is_default() {
        let config = GeneratorConfig::from_toml("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = GeneratorConfig::from_toml(
            r##"
            output_dir = "/srv/passes"
            event_label = "EXPO 2026 ENTRY PASS"

            [style]
            ec_level = "Q"
            dark = "#000000"

            [batch]
            max_workers = 8
            timeout_secs = 30
            "##,
        )
        .unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/srv/passes"));
        assert_eq!(config.style.ec_level, EcLevel::Q);
        assert_eq!(config.style.light, "#F5DEB3");
        assert_eq!(config.style.module_px, 10);
        assert_eq!(config.batch.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.placement, Placement::default());
    }

    #[test]
    fn test_unknown_ec_level_rejected() {
        let err = GeneratorConfig::from_toml("[style]\nec_level = \"Z\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_round_trip_toml() {
        let config = GeneratorConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(GeneratorConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_from_file_resolves_relative_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passforge.toml");
        std::fs::write(&path, "assets_dir = \"assets\"\n").unwrap();
        let config = GeneratorConfig::from_file(&path).unwrap();
        assert_eq!(config.assets_dir, dir.path().join("assets"));
        assert_eq!(config.output_dir, dir.path().join("generated_passes"));
    }
}
