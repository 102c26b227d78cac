//! Multi-line chart common library
//!
//! Shared types and utilities for the chart overlay engine:
//!
//! - [`rows`] - Row data model and the data service request/response types
//! - [`config`] - Chart and application configuration (JSON5 format)
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod rows;

// Re-export commonly used types at the crate root
pub use config::{
    AppConfig, ChartConfig, DEFAULT_MAX_POINTS, DataSourceConfig, LogFormat, LoggingConfig,
    MISSING_PARAMETERS, load_config, parse_config,
};
pub use error::{Error, Result};
pub use rows::{Row, SeriesRequest, SeriesResponse, ServiceError, ServiceErrorBody};

/// Initialize tracing with the given configuration.
///
/// Supports two output formats:
/// - `LogFormat::Text` (default): Human-readable text format
/// - `LogFormat::Json`: Structured JSON format for log aggregation systems
///
/// `RUST_LOG`, when set, takes precedence over `config.level`.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    Ok(())
}
