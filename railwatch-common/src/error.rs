//! Common error types for railwatch

use thiserror::Error;

/// Common result type for railwatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across railwatch crates
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML config file could not be parsed
    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}
