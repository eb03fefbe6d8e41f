//! Error types for Estate Vision

use thiserror::Error;

/// The main error type for Estate Vision operations
#[derive(Debug, Error)]
pub enum EstateError {
    #[error("Topic is empty")]
    EmptyTopic,

    #[error("API credential missing: {0}")]
    CredentialMissing(String),

    #[error("Generation error: {0}")]
    GenerationError(String),

    #[error("Video generation timed out after {attempts} poll attempts")]
    PollTimeout { attempts: u32 },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),
}

/// Result type alias for Estate Vision operations
pub type Result<T> = std::result::Result<T, EstateError>;

impl From<toml::de::Error> for EstateError {
    fn from(err: toml::de::Error) -> Self {
        EstateError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for EstateError {
    fn from(err: toml::ser::Error) -> Self {
        EstateError::TomlSerError(err.to_string())
    }
}
