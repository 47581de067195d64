//! Tracing subscriber initialization.

use tracing_subscriber::EnvFilter;

use crate::config::logging::LoggingConfig;
use crate::error::AppError;

/// Initialize the global tracing subscriber from configuration.
///
/// The configured level acts as the default directive; `RUST_LOG` overrides
/// it when set. Returns an error if a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| AppError::configuration(format!("Invalid log level: {e}")))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if config.format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| AppError::configuration(format!("Failed to init logging: {e}")))
}
