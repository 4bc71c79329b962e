use std::sync::{Arc, OnceLock};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    backend::{Libsecam, LibsecamHandle},
    config::{Config, LoggingConfig, LOG_ENV},
    error::{Result, Secamiz0rError},
    filter::SecamFilter,
};

/// Process-wide plugin state, set up once on first use
#[derive(Debug)]
pub(crate) struct Runtime {
    config: Config,
    library: std::result::Result<Arc<Libsecam>, String>,
}

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// The shared runtime, initializing it on first call
pub(crate) fn runtime() -> &'static Runtime {
    RUNTIME.get_or_init(Runtime::start)
}

impl Runtime {
    fn start() -> Self {
        let (config, config_error) = effective_config();

        init_logging(&config.logging);

        if let Some(e) = config_error {
            warn!("Using defaults for unusable configuration: {}", e.user_message());
        }

        let library = load_library(&config).map(Arc::new).map_err(|e| {
            warn!("{}", e.user_message());
            e.to_string()
        });

        Self { config, library }
    }

    #[cfg(test)]
    pub(crate) fn with_library(config: Config, library: std::result::Result<Libsecam, String>) -> Self {
        Self {
            config,
            library: library.map(Arc::new),
        }
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    /// Create a filter instance with the configured default intensity
    pub(crate) fn construct(&self, width: u32, height: u32) -> Result<SecamFilter<LibsecamHandle>> {
        let library = self
            .library
            .as_ref()
            .map_err(|reason| Secamiz0rError::generic(format!("libsecam unavailable: {reason}")))?;

        let handle = library.open(width, height)?;
        let filter = SecamFilter::with_intensity(handle, width, height, self.config.filter.default_intensity)?;

        info!("Constructed {}x{} instance at intensity {}", width, height, filter.intensity());
        Ok(filter)
    }
}

/// The configuration to run with, even when the file or environment is bad
///
/// An unreadable file falls back to defaults and an invalid section falls
/// back to its own defaults; the library override from the environment is
/// applied either way.
fn effective_config() -> (Config, Option<Secamiz0rError>) {
    let (mut config, mut error) = match Config::from_env_file() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    config.apply_env();

    if let Err(e) = config.validate() {
        config = config.repaired();
        error.get_or_insert(e);
    }

    (config, error)
}

#[cfg(not(feature = "linked"))]
fn load_library(config: &Config) -> Result<Libsecam> {
    match &config.library.path {
        Some(path) => Libsecam::load(path),
        None => Libsecam::load_default(),
    }
}

#[cfg(feature = "linked")]
fn load_library(config: &Config) -> Result<Libsecam> {
    match &config.library.path {
        Some(path) => Libsecam::load(path),
        None => Ok(Libsecam::linked()),
    }
}

/// Install a stderr subscriber if asked to and the host has none
fn init_logging(config: &LoggingConfig) {
    let directive = std::env::var(LOG_ENV).ok();
    if directive.is_none() && !config.enabled {
        return;
    }

    let filter = EnvFilter::try_new(directive.as_deref().unwrap_or(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("secamiz0r=info"));

    // A subscriber installed by the host takes precedence
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CONFIG_ENV, LIBRARY_ENV};
    use tempfile::tempdir;

    // The only test in this crate's unit tests that touches the environment
    #[test]
    fn test_library_override_survives_invalid_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("secamiz0r.toml");
        std::fs::write(&config_path, "[filter]\ndefault_intensity = 1.5\n\n[logging]\nfilter = \"secamiz0r=warn\"\n").unwrap();
        let override_path = dir.path().join("libsecam-custom.so");

        std::env::set_var(CONFIG_ENV, &config_path);
        std::env::set_var(LIBRARY_ENV, &override_path);
        let runtime = Runtime::start();
        std::env::remove_var(CONFIG_ENV);
        std::env::remove_var(LIBRARY_ENV);

        let config = runtime.config();
        assert_eq!(config.library.path, Some(override_path.clone()));
        assert_eq!(config.filter.default_intensity, crate::DEFAULT_INTENSITY);
        assert_eq!(config.logging.filter, "secamiz0r=warn");

        let reason = runtime.library.as_ref().unwrap_err();
        assert!(reason.contains(override_path.to_str().unwrap()));
        assert!(runtime.construct(8, 8).is_err());
    }

    #[test]
    fn test_construct_uses_configured_default_intensity() {
        let mut config = Config::default();
        config.filter.default_intensity = 0.75;
        let runtime = Runtime::with_library(config, Ok(crate::backend::fake::library()));

        let filter = runtime.construct(16, 16).unwrap();
        assert_eq!(filter.intensity(), 0.75);
        let ctx = crate::backend::fake::context(filter.backend());
        assert_eq!(ctx.options.echo_offset, crate::SecamOptions::from_intensity(0.75).echo_offset);
    }
}
