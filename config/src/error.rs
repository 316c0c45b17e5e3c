//! Error types for loading configuration and descriptor files.

use cmdbind_core::ConfigurationError;
use thiserror::Error;

/// Errors that can occur while loading files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File extension is neither JSON nor YAML.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The descriptors were read but do not form a valid registry.
    #[error("invalid descriptors:\n{0}")]
    Registry(#[from] ConfigurationError),
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
