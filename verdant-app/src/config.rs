use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};
use verdant_schemas::threshold::Thresholds;

const DEFAULT_CONFIG_PATH: &str = "verdant.yaml";

/// Runtime settings for the `verdant` binary, read from YAML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Healthy bands used to classify recorded values and to place
    /// placeholder readings.
    pub thresholds: Thresholds,
    /// Show synthetic healthy readings for plants that have reported nothing.
    pub placeholders: bool,
    /// Where favorites and notification read flags are kept.
    pub preferences_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            placeholders: false,
            preferences_path: "verdant-preferences.json".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads the config from `path`, or from `verdant.yaml` in the working
    /// directory when no path is given. A missing default file yields the
    /// built-in defaults; a missing explicit file is an error.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG_PATH, false),
        };

        if !explicit && !Path::new(path).exists() {
            tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_PATH);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML from {}", path))?;
        tracing::info!(path, placeholders = config.placeholders, "configuration loaded");
        Ok(config)
    }
}
