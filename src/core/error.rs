use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BandLogosError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Path error: {0}")]
    PathError(String),
    #[error("Config error: {0}")]
    ConfigError(String),
    #[error("Registry error: {0}")]
    RegistryError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl BandLogosError {
    /// Process exit status for this error.
    ///
    /// A failed validation run has already printed its report, so it maps to
    /// the dedicated status `2`; every other error is fatal and maps to `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            BandLogosError::ValidationError(_) => crate::core::validate::EXIT_VALIDATION_FAILED,
            _ => 1,
        }
    }
}
