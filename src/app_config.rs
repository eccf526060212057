use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::uploadable::{EntityKeymaker, DEFAULT_MAX_LENGTH, DEFAULT_PATTERN};

/// Extension configuration module
/// This module handles the configuration of the translatable and uploadable
/// behaviors, including loading, validating and saving it.
/// Represents the extension configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExtensionConfig {
    /// Locale used when an entity has none (e.g. "en", "pl_PL")
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Translatable behavior settings
    #[serde(default)]
    pub translatable: TranslatableConfig,

    /// Uploadable behavior settings
    #[serde(default)]
    pub uploadable: UploadableConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translatable behavior configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslatableConfig {
    /// Load the default locale when the current one has no translation
    #[serde(default = "default_true")]
    pub default_locale_fallback: bool,
}

impl Default for TranslatableConfig {
    fn default() -> Self {
        Self {
            default_locale_fallback: default_true(),
        }
    }
}

/// Uploadable behavior configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UploadableConfig {
    /// Key pattern, the keymaker default when unset
    #[serde(default)]
    pub key_pattern: Option<String>,

    /// Maximum key length
    #[serde(default = "default_key_length")]
    pub key_length: usize,
}

impl Default for UploadableConfig {
    fn default() -> Self {
        Self {
            key_pattern: None,
            key_length: default_key_length(),
        }
    }
}

impl UploadableConfig {
    /// Pattern keys are created with
    pub fn effective_pattern(&self) -> &str {
        self.key_pattern.as_deref().unwrap_or(DEFAULT_PATTERN)
    }

    /// Keymaker configured from these settings
    pub fn keymaker(&self) -> EntityKeymaker {
        EntityKeymaker::new(self.effective_pattern(), self.key_length)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

fn default_key_length() -> usize {
    DEFAULT_MAX_LENGTH
}

impl ExtensionConfig {
    /// Load and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);

        let config: ExtensionConfig = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;

        Ok(config)
    }

    /// Parse and validate a configuration from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ExtensionConfig =
            serde_json::from_str(json).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::locale::validate_locale(&self.default_locale)
            .with_context(|| format!("Invalid default locale: {}", self.default_locale))?;

        if self.uploadable.key_length == 0 {
            return Err(anyhow!("Uploadable key length must be greater than zero"));
        }

        if let Some(pattern) = &self.uploadable.key_pattern {
            // pattern must render with sample values
            self.uploadable
                .keymaker()
                .render("Entity", "file", "1", "file.txt", Some(pattern.as_str()))
                .with_context(|| format!("Invalid uploadable key pattern: {}", pattern))?;
        }

        Ok(())
    }
}

/// Default implementation for ExtensionConfig
impl Default for ExtensionConfig {
    fn default() -> Self {
        ExtensionConfig {
            default_locale: default_locale(),
            translatable: TranslatableConfig::default(),
            uploadable: UploadableConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
