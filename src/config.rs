//! Configuration for the render engine

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading an engine configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration options for rendering
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Text joined between a sequence's rendered children
    pub separator: String,

    /// Ceiling on resolution passes. Acyclic graphs settle within their
    /// longest dependency chain plus two passes, so this only trips on an
    /// engine bug.
    pub max_passes: usize,

    /// Debug mode: trace resolution passes and the final tree to stderr
    pub debug: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            separator: "\n".to_string(),
            max_passes: 32,
            debug: false,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the separator joined between sequence children
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set the resolution pass ceiling
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Enable or disable debug tracing
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
