// file: src/error.rs
// version: 1.0.0
// guid: 1fa90514-4c22-4c7a-aac2-17d7da59bc1f

use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, CompileDumpError>;

/// Error types for dump compilation
#[derive(Error, Debug)]
pub enum CompileDumpError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Dump error: {0}")]
    DumpError(String),

    #[error("Archive error: {0}")]
    ArchiveError(#[from] zip::result::ZipError),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Distribution error: {0}")]
    DistributionError(String),

    #[error("Execution error: {0}")]
    ExecutionError(String),

    #[error("Retrace error: {0}")]
    RetraceError(String),
}

impl CompileDumpError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a new dump error
    pub fn dump(msg: impl Into<String>) -> Self {
        Self::DumpError(msg.into())
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::NetworkError(msg.into())
    }

    /// Create a new distribution error
    pub fn distribution(msg: impl Into<String>) -> Self {
        Self::DistributionError(msg.into())
    }

    /// Create a new execution error
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::ExecutionError(msg.into())
    }

    /// Create a new retrace error
    pub fn retrace(msg: impl Into<String>) -> Self {
        Self::RetraceError(msg.into())
    }
}
