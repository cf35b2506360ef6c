//! Error types for polyvox.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolyvoxError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Object storage errors
    #[error("Storage error: {message}")]
    Storage { message: String },

    // Audio transcoding errors
    #[error("Transcoding failed: {message}")]
    Transcode { message: String },

    #[error("External tool not found: {tool}")]
    ToolNotFound { tool: String },

    // Capability errors (recognition, generation, translation, synthesis)
    #[error("{operation} failed: {message}")]
    Api { operation: String, message: String },

    #[error("{operation} did not complete within {secs}s")]
    OperationTimeout { operation: String, secs: u64 },

    // Transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, PolyvoxError>;
