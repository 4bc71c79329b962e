use thiserror::Error;

/// Main error type for the secamiz0r library
#[derive(Error, Debug)]
pub enum Secamiz0rError {
    #[error("libsecam error: {0}")]
    Backend(#[from] BackendError),

    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Errors raised while loading or driving libsecam
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to load libsecam from {path}: {source}")]
    LoadFailed {
        path: String,
        #[source]
        source: libloading::Error,
    },

    #[error("libsecam is missing symbol {symbol}: {source}")]
    MissingSymbol {
        symbol: &'static str,
        #[source]
        source: libloading::Error,
    },

    #[error("libsecam_init failed for {width}x{height} frames")]
    InitFailed { width: u32, height: u32 },

    #[error("libsecam returned no option block")]
    OptionsUnavailable,
}

/// Frame and buffer errors
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Invalid frame dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Failed to load image: {path}")]
    LoadFailed { path: String },

    #[error("Failed to save image {path}: {reason}")]
    SaveFailed { path: String, reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using Secamiz0rError
pub type Result<T> = std::result::Result<T, Secamiz0rError>;

impl Secamiz0rError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            // Context creation can fail on a transient allocation failure
            Self::Backend(BackendError::InitFailed { .. }) => true,
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend(BackendError::LoadFailed { path, .. }) => {
                format!(
                    "Could not load libsecam from '{}'. Install it or point SECAMIZ0R_LIBRARY at the shared library.",
                    path
                )
            }
            Self::Backend(BackendError::MissingSymbol { symbol, .. }) => {
                format!("The loaded library does not look like libsecam (missing '{}').", symbol)
            }
            Self::Frame(FrameError::LoadFailed { path }) => {
                format!("Could not load image '{}'. Please check the file exists and is a PNG or JPEG.", path)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
