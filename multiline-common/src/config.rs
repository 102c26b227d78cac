use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Message reported when any required chart input is missing.
pub const MISSING_PARAMETERS: &str = "Please configure all required parameters.";

/// Default cap on the number of rows requested from the data service.
pub const DEFAULT_MAX_POINTS: u32 = 200;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

/// Common logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "text" or "json".
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Properties of one embedded chart component.
///
/// Field names follow the host's property names (`fieldsCsv`, `recordId`, ...)
/// so an exported component configuration can be loaded as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    /// Display title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Comma-separated metric field identifiers, in series order.
    #[serde(default)]
    pub fields_csv: Option<String>,

    /// Child object whose rows are charted.
    #[serde(default)]
    pub child_object_api_name: Option<String>,

    /// Field on the child object used as the x axis.
    #[serde(default)]
    pub date_field_api_name: Option<String>,

    /// Lookup path from the child object back to the owning record.
    #[serde(default)]
    pub parent_lookup_path: Option<String>,

    /// Optional date filter passed through to the data service.
    #[serde(default)]
    pub date_filter: Option<String>,

    /// Maximum number of rows to request; 0 disables the cap.
    #[serde(default = "default_max_points")]
    pub max_points: Option<u32>,

    /// Owning record identifier.
    #[serde(default)]
    pub record_id: Option<String>,
}

fn default_title() -> String {
    "Multi-Line Chart".to_string()
}

fn default_max_points() -> Option<u32> {
    Some(DEFAULT_MAX_POINTS)
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            fields_csv: None,
            child_object_api_name: None,
            date_field_api_name: None,
            parent_lookup_path: None,
            date_filter: None,
            max_points: default_max_points(),
            record_id: None,
        }
    }
}

impl ChartConfig {
    /// Check that every required input is present and non-blank.
    pub fn validate(&self) -> Result<()> {
        let required = [
            &self.record_id,
            &self.fields_csv,
            &self.child_object_api_name,
            &self.date_field_api_name,
            &self.parent_lookup_path,
        ];
        if required.iter().any(|v| is_blank(v.as_deref())) || self.metric_fields().is_empty() {
            return Err(Error::config(MISSING_PARAMETERS));
        }
        Ok(())
    }

    /// Metric field identifiers in declared order: split on commas, trimmed,
    /// empty entries dropped.
    pub fn metric_fields(&self) -> Vec<String> {
        self.fields_csv
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Row cap to request; `None` when unset or zero.
    pub fn effective_max_points(&self) -> Option<u32> {
        self.max_points.filter(|&n| n > 0)
    }

    /// Date filter to request; `None` when unset or blank.
    pub fn effective_date_filter(&self) -> Option<String> {
        self.date_filter
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|s| s.trim().is_empty())
}

/// Where the binary reads row data from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// JSON file holding the rows (or a full series response).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Configuration file for the command-line front end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chart component properties.
    #[serde(default)]
    pub chart: ChartConfig,

    /// Row data source.
    #[serde(default)]
    pub data: DataSourceConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Load a configuration file in JSON5 format.
pub fn load_config<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "Loading configuration");
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    json5::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Load a configuration from a JSON5 string.
pub fn parse_config<T: for<'de> Deserialize<'de>>(content: &str) -> Result<T> {
    json5::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
}
