//! Error types for deckswap_carousel
//!
//! The engine itself never fails. These errors only cover configuration
//! loaded from outside the program.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading, saving, or validating a [`CarouselConfig`](crate::CarouselConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the config file failed
    #[error("Config I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema
    #[error("Config parsing failed: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be encoded as TOML
    #[error("Config serialization failed: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A field holds a value the engine cannot use
    #[error("Invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
