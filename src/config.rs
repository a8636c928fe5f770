//! Configuration management for mirrorgrid
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{
    APP_NAME, CONFIG_FILE_NAME, CONFIG_GENERATED, CONFIG_MISSING, DEFAULT_ADDRESS, DEFAULT_PORT, XDG_CONFIG_FILE_NAME,
};
use crate::logger::LogLevel;
use crate::ui::layout::{LayoutConfig, Region};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// Unspecified keys keep their defaults, so a file only has to name what
/// it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the dashboard is served on
    pub address: String,
    pub port: u16,
    /// Language of the core strings, e.g. "en" or "nl"
    pub language: String,
    pub locale: String,
    /// Levels that reach the log; a set, not a threshold
    pub log_level: Vec<LogLevel>,
    /// Also write the log to a file in the local data directory
    pub log_to_file: bool,
    /// 12 or 24
    pub time_format: u8,
    pub units: Units,
    /// Grid placement of regions; the stacked layout is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutConfig>,
    pub modules: Vec<ModuleConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Metric,
    Imperial,
}

/// Where [`Config::load`] got its values from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file was found
    Defaults,
}

impl ConfigSource {
    /// Log where the configuration came from. A missing file is a
    /// configuration error and reported as such.
    pub fn report(&self) {
        match self {
            ConfigSource::File(path) => log::info!("Loaded configuration from {}", path.display()),
            ConfigSource::Defaults => log::error!("{}", CONFIG_MISSING),
        }
    }
}

/// One module declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Module name as registered with the module factory
    pub module: String,
    /// Region to mount in; without one the module runs but is never shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Region>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// Extra space separated classes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    /// Module specific settings, merged over the module's defaults
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl ModuleConfig {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            position: None,
            header: None,
            classes: None,
            disabled: false,
            config: Map::new(),
        }
    }

    pub fn at(mut self, position: Region) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_classes(mut self, classes: impl Into<String>) -> Self {
        self.classes = Some(classes.into());
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            language: "en".to_string(),
            locale: "en-US".to_string(),
            log_level: LogLevel::default_levels(),
            log_to_file: false,
            time_format: 24,
            units: Units::Metric,
            layout: None,
            modules: vec![
                ModuleConfig::new("clock").at(Region::TopLeft),
                ModuleConfig::new("helloworld")
                    .at(Region::MiddleCenter)
                    .with_config("text", Value::String("Welcome to mirrorgrid".to_string())),
            ],
        }
    }
}

impl Config {
    /// Load configuration from the first file found, or the defaults when
    /// there is none.
    ///
    /// Nothing is logged here: configuration is read before the logger
    /// exists, so the caller reports the [`ConfigSource`] once logging is up.
    pub fn load() -> Result<(Self, ConfigSource)> {
        Self::load_or_default(Self::find_config_file()?)
    }

    /// Load `path` if given, otherwise fall back to the defaults.
    pub fn load_or_default(path: Option<PathBuf>) -> Result<(Self, ConfigSource)> {
        match path {
            Some(path) => {
                let config = Self::load_from_file(&path)?;
                Ok((config, ConfigSource::File(path)))
            }
            None => Ok((Self::default(), ConfigSource::Defaults)),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from(CONFIG_FILE_NAME);
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Ok(xdg_config) = Self::get_default_config_path() {
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be between 1 and 65535");
        }

        if self.time_format != 12 && self.time_format != 24 {
            anyhow::bail!("time_format must be 12 or 24, got {}", self.time_format);
        }

        if self.language.trim().is_empty() {
            anyhow::bail!("language cannot be empty");
        }

        for (index, module) in self.modules.iter().enumerate() {
            if module.module.trim().is_empty() {
                anyhow::bail!("modules[{}]: module name cannot be empty", index);
            }
        }

        if let Some(layout) = &self.layout {
            layout.grid.validate().context("Invalid [layout.grid] options")?;
        }

        Ok(())
    }

    /// Modules that will be mounted
    pub fn positioned_modules(&self) -> impl Iterator<Item = &ModuleConfig> {
        self.modules
            .iter()
            .filter(|m| !m.disabled && m.position.is_some())
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        // Add header comment
        let header = format!(
            "# mirrorgrid Configuration File\n# Generated on {}\n\n",
            chrono::Local::now().format("%Y-%m-%d")
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join(APP_NAME))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join(XDG_CONFIG_FILE_NAME))
    }
}
