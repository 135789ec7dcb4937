pub mod config;
pub mod error;

pub use config::{
    Config, DashboardConfig, LoggingConfig, MockConfig, SearchConfig, ValidationResult,
    DEFAULT_LOCATION,
};
pub use error::{AppError, ConfigError, DataError};

use anyhow::Result;

/// Initialize tracing/logging.
///
/// `RUST_LOG` takes precedence over `default_filter`. Calling this more than
/// once is harmless; later calls leave the first subscriber in place.
pub fn init_logging(default_filter: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
        return Ok(());
    }

    tracing::info!("Weatherdash core initialized");
    Ok(())
}
