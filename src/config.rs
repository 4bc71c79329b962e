use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    intensity::DEFAULT_INTENSITY,
};

/// Environment variable naming a TOML configuration file
pub const CONFIG_ENV: &str = "SECAMIZ0R_CONFIG";

/// Environment variable overriding the libsecam path
pub const LIBRARY_ENV: &str = "SECAMIZ0R_LIBRARY";

/// Environment variable carrying a tracing filter; enables logging when set
pub const LOG_ENV: &str = "SECAMIZ0R_LOG";

/// Main configuration for the plugin and the preview tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where to find libsecam
    pub library: LibraryConfig,

    /// Filter defaults
    pub filter: FilterConfig,

    /// Diagnostic output
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build the effective configuration from the environment
    ///
    /// Reads the file named by `SECAMIZ0R_CONFIG` if set, then lets
    /// `SECAMIZ0R_LIBRARY` override the library path.
    pub fn discover() -> Result<Self> {
        let mut config = Self::from_env_file()?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load the file named by `SECAMIZ0R_CONFIG`, or defaults when unset
    pub fn from_env_file() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    /// Apply `SECAMIZ0R_LIBRARY` on top of the current values
    pub fn apply_env(&mut self) {
        if let Some(path) = std::env::var_os(LIBRARY_ENV) {
            self.library.path = Some(PathBuf::from(path));
        }
    }

    /// Reset every section that fails validation to its defaults
    pub fn repaired(mut self) -> Self {
        if self.library.validate().is_err() {
            self.library = LibraryConfig::default();
        }
        if self.filter.validate().is_err() {
            self.filter = FilterConfig::default();
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.library.validate()?;
        self.filter.validate()?;
        Ok(())
    }
}

/// libsecam location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Explicit path to the shared library; the platform default name is
    /// searched when unset
    pub path: Option<PathBuf>,
}

impl LibraryConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "library.path".to_string(),
                    value: String::new()
                }.into());
            }
        }

        Ok(())
    }
}

/// Filter defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Intensity new instances start with (0.0-1.0)
    pub default_intensity: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            default_intensity: DEFAULT_INTENSITY,
        }
    }
}

impl FilterConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.default_intensity) {
            return Err(ConfigError::InvalidValue {
                key: "filter.default_intensity".to_string(),
                value: self.default_intensity.to_string()
            }.into());
        }

        Ok(())
    }
}

/// Logging settings for the plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Install a stderr subscriber when the host has none
    pub enabled: bool,

    /// Tracing filter directive, e.g. "secamiz0r=debug"
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            filter: "secamiz0r=info".to_string(),
        }
    }
}
