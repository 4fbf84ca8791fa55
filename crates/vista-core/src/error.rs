//! Error types for Vista.
//!
//! Per-request failures are collected in [`AnalyzeError`]; the endpoint turns
//! every variant into the same client-facing message. Startup problems are
//! [`ConfigError`]s.

use thiserror::Error;

/// Top-level error type for Vista operations.
#[derive(Error, Debug)]
pub enum VistaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Image analysis errors
    #[error("Analysis error: {0}")]
    Analyze(#[from] AnalyzeError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failures of a single upload-to-description request.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    /// The submitted file could not be read from the request
    #[error("failed to read uploaded image: {0}")]
    UploadRead(String),

    /// The vision API could not be reached
    #[error("failed to reach vision API: {0}")]
    Network(String),

    /// The vision API answered with a non-success status
    #[error("vision API returned HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    /// The vision API response was not the expected JSON
    #[error("invalid vision API response: {0}")]
    Parse(String),
}

impl AnalyzeError {
    /// Short stable name of the failure kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyzeError::UploadRead(_) => "upload_read",
            AnalyzeError::Network(_) => "network",
            AnalyzeError::Remote { .. } => "remote",
            AnalyzeError::Parse(_) => "parse",
        }
    }
}

/// Convenience type alias for Vista results.
pub type Result<T> = std::result::Result<T, VistaError>;

/// Convenience type alias for per-request analysis results.
pub type AnalyzeResult<T> = std::result::Result<T, AnalyzeError>;
