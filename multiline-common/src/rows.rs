use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::config::ChartConfig;
use crate::error::{Error, Result};

/// One sample along the time axis, shared by every series.
///
/// Metric values are kept as raw JSON so that a non-numeric value for a
/// field is carried through and simply skipped by numeric consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Raw date-like x value (ordering key).
    #[serde(deserialize_with = "string_or_number")]
    pub x: String,

    /// Identifier of the record this row belongs to.
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,

    /// Display name of the record.
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Metric values keyed by field identifier.
    #[serde(flatten)]
    pub values: BTreeMap<String, serde_json::Value>,
}

impl Row {
    /// Create a row with no metric values.
    pub fn new(x: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            record_id: None,
            name: None,
            values: BTreeMap::new(),
        }
    }

    /// Set the owning record identifier.
    pub fn with_record_id(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a metric value; `None` stores an explicit null.
    pub fn with_value(mut self, field: impl Into<String>, value: Option<f64>) -> Self {
        let json = value
            .and_then(serde_json::Number::from_f64)
            .map_or(serde_json::Value::Null, serde_json::Value::Number);
        self.values.insert(field.into(), json);
        self
    }

    /// Numeric value of `field`, if present and numeric.
    pub fn metric(&self, field: &str) -> Option<f64> {
        self.values
            .get(field)
            .and_then(serde_json::Value::as_f64)
            .filter(|v| v.is_finite())
    }

    /// Keep only the listed metric fields; missing ones become null.
    pub fn project(&self, fields: &[String]) -> Self {
        let values = fields
            .iter()
            .map(|f| {
                let v = self.values.get(f).cloned().unwrap_or(serde_json::Value::Null);
                (f.clone(), v)
            })
            .collect();
        Self {
            x: self.x.clone(),
            record_id: self.record_id.clone(),
            name: self.name.clone(),
            values,
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Request sent to the data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRequest {
    pub parent_id: String,
    pub child_object_api_name: String,
    pub date_field_api_name: String,
    pub parent_lookup_path: String,
    pub metric_field_api_names: Vec<String>,
    #[serde(default)]
    pub max_points: Option<u32>,
    #[serde(default)]
    pub date_filter: Option<String>,
}

impl SeriesRequest {
    /// Build a request from a chart configuration, validating it first.
    pub fn from_config(config: &ChartConfig) -> Result<Self> {
        config.validate()?;
        let required = |v: &Option<String>| v.clone().unwrap_or_default().trim().to_string();
        Ok(Self {
            parent_id: required(&config.record_id),
            child_object_api_name: required(&config.child_object_api_name),
            date_field_api_name: required(&config.date_field_api_name),
            parent_lookup_path: required(&config.parent_lookup_path),
            metric_field_api_names: config.metric_fields(),
            max_points: config.effective_max_points(),
            date_filter: config.effective_date_filter(),
        })
    }
}

/// Response returned by the data service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesResponse {
    /// Rows in x order.
    #[serde(default)]
    pub rows: Vec<Row>,

    /// Display label per field identifier.
    #[serde(default)]
    pub field_labels: HashMap<String, String>,

    /// Display label of the child object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_label: Option<String>,
}

/// Structured body of a rejected service call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// A rejected data service call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceError {
    #[serde(default)]
    pub body: Option<ServiceErrorBody>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: String,
}

impl ServiceError {
    /// Error carrying a structured body message.
    pub fn with_body(message: impl Into<String>) -> Self {
        Self {
            body: Some(ServiceErrorBody {
                message: Some(message.into()),
            }),
            ..Self::default()
        }
    }

    /// Error carrying only a plain message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Error carrying only an opaque description.
    pub fn other(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            ..Self::default()
        }
    }

    /// Body message, else plain message, else the opaque description.
    pub fn display_message(&self) -> String {
        self.body
            .as_ref()
            .and_then(|b| b.message.clone())
            .filter(|m| !m.is_empty())
            .or_else(|| self.message.clone().filter(|m| !m.is_empty()))
            .unwrap_or_else(|| self.detail.clone())
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_message())
    }
}

impl std::error::Error for ServiceError {}

impl From<ServiceError> for Error {
    fn from(e: ServiceError) -> Self {
        Error::DataFetch(e.display_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_deserialize() {
        let json = r#"{"x":"2024-01-01","Id":"a01","Name":"R-1","A":10,"B":null,"C":"n/a"}"#;
        let row: Row = serde_json::from_str(json).unwrap();

        assert_eq!(row.x, "2024-01-01");
        assert_eq!(row.record_id.as_deref(), Some("a01"));
        assert_eq!(row.name.as_deref(), Some("R-1"));
        assert_eq!(row.metric("A"), Some(10.0));
        assert_eq!(row.metric("B"), None);
        assert_eq!(row.metric("C"), None);
        assert_eq!(row.metric("missing"), None);
    }

    #[test]
    fn test_row_numeric_x() {
        let row: Row = serde_json::from_str(r#"{"x":1704067200000}"#).unwrap();
        assert_eq!(row.x, "1704067200000");
    }

    #[test]
    fn test_row_builder_and_project() {
        let row = Row::new("2024-01-02")
            .with_record_id("a02")
            .with_value("A", Some(5.0))
            .with_value("B", None)
            .with_value("Z", Some(1.0));

        let projected = row.project(&["B".to_string(), "A".to_string(), "Q".to_string()]);
        assert_eq!(projected.values.len(), 3);
        assert_eq!(projected.metric("A"), Some(5.0));
        assert_eq!(projected.metric("Q"), None);
        assert!(!projected.values.contains_key("Z"));
        assert_eq!(projected.record_id.as_deref(), Some("a02"));
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let config = ChartConfig {
            fields_csv: Some("A,B".to_string()),
            child_object_api_name: Some("Reading__c".to_string()),
            date_field_api_name: Some("Date__c".to_string()),
            parent_lookup_path: Some("Account__c".to_string()),
            record_id: Some("001".to_string()),
            ..ChartConfig::default()
        };
        let request = SeriesRequest::from_config(&config).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["parentId"], "001");
        assert_eq!(json["metricFieldApiNames"], serde_json::json!(["A", "B"]));
        assert_eq!(json["maxPoints"], 200);
        assert!(json["dateFilter"].is_null());
    }

    #[test]
    fn test_service_error_message_chain() {
        assert_eq!(ServiceError::with_body("from body").display_message(), "from body");
        assert_eq!(ServiceError::with_message("plain").display_message(), "plain");
        assert_eq!(ServiceError::other("opaque").display_message(), "opaque");

        let mixed = ServiceError {
            body: Some(ServiceErrorBody { message: None }),
            message: Some("fallback".to_string()),
            detail: "ignored".to_string(),
        };
        assert_eq!(mixed.display_message(), "fallback");

        let err: Error = ServiceError::with_body("denied").into();
        assert!(matches!(err, Error::DataFetch(ref m) if m == "denied"));
    }
}
