//! Logging setup on top of the tracing ecosystem.
//!
//! The engine itself only emits `tracing` events; a host calls
//! [`init_logging`] (or [`basic_config`]) once to get them printed.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log levels accepted by [`LoggerConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warning => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for LogLevel {
    type Err = crate::UtilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(crate::UtilError::Config(format!(
                "Invalid log level: '{s}'. Valid options: trace, debug, info, warning, error"
            ))),
        }
    }
}

/// Subscriber configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub include_location: bool,
    pub include_thread_id: bool,
    pub colored_output: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            include_location: false,
            include_thread_id: false,
            colored_output: true,
        }
    }
}

/// Initialize logging with configuration.
///
/// `RUST_LOG` overrides the configured level when set.
pub fn init_logging(config: &LoggerConfig) -> crate::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::from(config.level).into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(config.include_thread_id)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_ansi(config.colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| crate::UtilError::Config(format!("Failed to initialize logging: {e}")))?;

    Ok(())
}

/// Initialize logging with defaults and an optional level
pub fn basic_config(level: Option<LogLevel>) -> crate::Result<()> {
    let config = LoggerConfig {
        level: level.unwrap_or(LogLevel::Info),
        ..Default::default()
    };
    init_logging(&config)
}
