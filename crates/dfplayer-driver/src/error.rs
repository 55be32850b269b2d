//! Error types for the driver.

use std::io;

use thiserror::Error;

/// Errors returned by driver operations.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The module did not answer the status query issued during construction.
    #[error("module is not responding")]
    NotResponding,

    /// Advert tracks are numbered 1-9999.
    #[error("advert track {0} out of range 1-9999")]
    InvalidAdvertTrack(u16),

    /// The transport failed to write or read.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
}

/// Result type alias for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors that can occur when loading a driver configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML could not be parsed into a configuration.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}
