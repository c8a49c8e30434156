//! Viewer configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::layout::LayoutMetrics;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub layout: LayoutMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Directory (or URL prefix on the web) holding `<name>.json` documents
    #[serde(default = "default_models_base")]
    pub base: String,
    /// Model loaded at startup
    #[serde(default = "default_model")]
    pub default: String,
    /// Models offered by the model selector
    #[serde(default = "default_available")]
    pub available: Vec<String>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            base: default_models_base(),
            default: default_model(),
            available: default_available(),
        }
    }
}

fn default_models_base() -> String {
    crate::loader::MODELS_DIR.to_string()
}

fn default_model() -> String {
    "human".to_string()
}

fn default_available() -> Vec<String> {
    vec!["human".to_string(), "library".to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Start with free orbit instead of 2D framing
    #[serde(default)]
    pub start_in_3d: bool,
    /// Clear colour as `#RRGGBB`
    #[serde(default = "default_background")]
    pub background: String,
    /// Vertical field of view of the camera
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    /// Camera distance used when there is nothing to frame
    #[serde(default = "default_distance")]
    pub default_distance: f32,
    /// Multiplier applied to the 2D framing distance
    #[serde(default = "default_framing_margin")]
    pub framing_margin: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            start_in_3d: false,
            background: default_background(),
            fov_degrees: default_fov(),
            default_distance: default_distance(),
            framing_margin: default_framing_margin(),
        }
    }
}

fn default_background() -> String {
    "#f0f0f0".to_string()
}

fn default_fov() -> f32 {
    50.0
}

fn default_distance() -> f32 {
    10.0
}

fn default_framing_margin() -> f32 {
    1.2
}

impl Config {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Load configuration from file, falling back to defaults when it is absent
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config = Config::from_toml_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<(), ConfigError> {
    let content = Config::default().to_toml_string()?;
    std::fs::write(path, content)?;
    Ok(())
}
