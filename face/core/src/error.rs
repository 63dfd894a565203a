//! Error Types
//!
//! Only construction can fail. Once an [`Engine`](crate::Engine) exists every
//! runtime path degrades instead of erroring: unknown names fall back to a
//! default, out-of-range inputs are clamped and lock contention drops the
//! command or frame.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors surfaced when bringing up an engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration was loaded but is unusable
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// The host graphics layer could not provide a drawing surface
    #[error("Drawing surface unavailable ({width}x{height}): {reason}")]
    SurfaceUnavailable {
        /// Requested surface width
        width: u16,
        /// Requested surface height
        height: u16,
        /// Backend-specific reason
        reason: String,
    },

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias for engine construction
pub type EngineResult<T> = Result<T, EngineError>;
