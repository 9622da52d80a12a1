pub mod config;
pub mod error;

pub use config::{Config, HistoryConfig, UnitSystem, ValidationResult, WeatherConfig};
pub use error::{AppError, ConfigError, NetworkError};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("wxdash core initialized");
    Ok(())
}
