//! Configuration File Loading
//!
//! Handles loading configuration files from various locations
//! with support for multiple formats and fallback to defaults.

use super::Config;
use crate::error::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file loader
pub struct ConfigLoader {
    /// Search paths for configuration files (without extension)
    search_paths: Vec<PathBuf>,
    /// Supported configuration file formats
    supported_formats: Vec<ConfigFormat>,
    /// Current configuration file path (if loaded)
    current_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Pick a format from a file extension, defaulting to TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }

    fn extension(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }

    fn name(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            search_paths: Self::get_search_paths(),
            supported_formats: vec![ConfigFormat::Toml, ConfigFormat::Json],
            current_path: None,
        }
    }

    /// Load configuration from the search paths, falling back to defaults
    pub fn load() -> Result<Config> {
        let mut loader = Self::new();
        loader.load_or_default()
    }

    /// Load configuration from an explicit file, which must exist
    pub fn load_from_path(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(Error::ConfigLoadFailed {
                path: path.to_path_buf(),
                reason: "Configuration file does not exist".to_string(),
            });
        }

        let loader = Self::new();
        let config = loader.load_config_file(path, ConfigFormat::from_path(path))?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Search for a configuration file and load it, or return defaults
    pub fn load_or_default(&mut self) -> Result<Config> {
        let config = match self.find_and_load_config()? {
            Some((path, config)) => {
                debug!("Loaded configuration from {}", path.display());
                self.current_path = Some(path);
                config
            }
            None => {
                debug!("No configuration file found, using defaults");
                Config::default()
            }
        };

        validate_config(&config)?;
        Ok(config)
    }

    /// Find and load configuration from search paths
    fn find_and_load_config(&self) -> Result<Option<(PathBuf, Config)>> {
        for path in &self.search_paths {
            for format in &self.supported_formats {
                let config_path = path.with_extension(format.extension());

                if config_path.exists() {
                    match self.load_config_file(&config_path, *format) {
                        Ok(config) => return Ok(Some((config_path, config))),
                        Err(e) => {
                            // Keep searching; a broken file should not hide a good one
                            warn!("Failed to load config from {}: {}", config_path.display(), e);
                            continue;
                        }
                    }
                }
            }
        }

        Ok(None)
    }

    /// Load a specific configuration file
    fn load_config_file(&self, path: &Path, format: ConfigFormat) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        match format {
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                format: format.name().to_string(),
                reason: e.to_string(),
            }),
            ConfigFormat::Json => {
                serde_json::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Get default search paths for configuration files
    fn get_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Project-local config wins
        if let Ok(cwd) = env::current_dir() {
            paths.push(cwd.join("shadcn-term"));
        }

        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg_config).join("shadcn-term").join("config"));
        }

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("shadcn-term").join("config"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".shadcn-term"));
        }

        paths
    }

    /// Get the current configuration file path
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// List all search paths
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Clear all search paths and add a single path
    pub fn set_search_path(&mut self, path: PathBuf) {
        self.search_paths = vec![path];
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.registry.url.trim().is_empty() {
        return Err(Error::ConfigValidationFailed {
            field: "registry.url".to_string(),
            reason: "Registry URL cannot be empty".to_string(),
        });
    }

    if config.registry.request_timeout_secs == 0 {
        return Err(Error::ConfigValidationFailed {
            field: "registry.request_timeout_secs".to_string(),
            reason: "Request timeout must be greater than 0".to_string(),
        });
    }

    if config.commands.runner.trim().is_empty() {
        return Err(Error::ConfigValidationFailed {
            field: "commands.runner".to_string(),
            reason: "Runner cannot be empty".to_string(),
        });
    }

    if config.docs.base_url.trim().is_empty() {
        return Err(Error::ConfigValidationFailed {
            field: "docs.base_url".to_string(),
            reason: "Documentation URL cannot be empty".to_string(),
        });
    }

    if config.terminal.shell_integration_timeout_ms == 0 {
        return Err(Error::ConfigValidationFailed {
            field: "terminal.shell_integration_timeout_ms".to_string(),
            reason: "Shell integration timeout must be greater than 0".to_string(),
        });
    }

    let (cols, rows) = config.terminal.dimensions;
    if cols < 20 || rows < 5 {
        return Err(Error::ConfigValidationFailed {
            field: "terminal.dimensions".to_string(),
            reason: "Terminal must be at least 20 columns by 5 rows".to_string(),
        });
    }

    if config.telemetry.enabled && config.telemetry.endpoint.trim().is_empty() {
        return Err(Error::ConfigValidationFailed {
            field: "telemetry.endpoint".to_string(),
            reason: "Telemetry endpoint cannot be empty when telemetry is enabled".to_string(),
        });
    }

    Ok(())
}
