//! astlens utilities - logging and configuration
//!
//! This crate holds the ambient pieces shared by the engine and by whatever
//! host drives it: tracing subscriber setup and serde-based configuration
//! file loading.

//#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod config;
pub mod logging;

/// Re-export commonly used utilities
pub use config::{load_config, merge_configs, ConfigBuilder};
pub use logging::{basic_config, init_logging, LogLevel, LoggerConfig};

/// Result type used throughout astlens utilities
pub type Result<T> = std::result::Result<T, UtilError>;

/// Error types for utility operations
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}
