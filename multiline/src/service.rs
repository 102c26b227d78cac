//! Row data retrieval.

use std::future::Future;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use multiline_common::{Row, SeriesRequest, SeriesResponse, ServiceError};

/// Remote source of chart rows.
pub trait DataService {
    /// Fetch rows and labels for `request`.
    fn fetch_series(
        &self,
        request: &SeriesRequest,
    ) -> impl Future<Output = Result<SeriesResponse, ServiceError>>;
}

/// Serves rows from a JSON file.
///
/// The file holds either a bare array of rows or a full response object with
/// `rows`, `fieldLabels` and `objectLabel`.
#[derive(Debug, Clone)]
pub struct JsonFileService {
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FileContent {
    Rows(Vec<Row>),
    Response(SeriesResponse),
}

impl JsonFileService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataService for JsonFileService {
    async fn fetch_series(&self, request: &SeriesRequest) -> Result<SeriesResponse, ServiceError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ServiceError::with_message(format!(
                "Failed to read data file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        let response = match serde_json::from_str::<FileContent>(&content) {
            Ok(FileContent::Rows(rows)) => SeriesResponse {
                rows,
                ..SeriesResponse::default()
            },
            Ok(FileContent::Response(response)) => response,
            Err(e) => {
                return Err(ServiceError::with_body(format!(
                    "Invalid data file '{}': {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if let Some(filter) = &request.date_filter {
            tracing::debug!(filter = %filter, "Date filter is not applied to file data");
        }

        Ok(select(response, request))
    }
}

/// Project rows onto the requested fields and keep at most `max_points` of
/// the most recent rows.
pub fn select(mut response: SeriesResponse, request: &SeriesRequest) -> SeriesResponse {
    let fields = &request.metric_field_api_names;
    if let Some(max) = request.max_points {
        let max = max as usize;
        if response.rows.len() > max {
            response.rows.drain(..response.rows.len() - max);
        }
    }
    response.rows = response.rows.iter().map(|r| r.project(fields)).collect();
    response.field_labels.retain(|field, _| fields.contains(field));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(fields: &[&str], max_points: Option<u32>) -> SeriesRequest {
        SeriesRequest {
            parent_id: "001".to_string(),
            child_object_api_name: "Reading__c".to_string(),
            date_field_api_name: "Date__c".to_string(),
            parent_lookup_path: "Account__c".to_string(),
            metric_field_api_names: fields.iter().map(|f| f.to_string()).collect(),
            max_points,
            date_filter: None,
        }
    }

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("multiline-service-tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_select_projects_and_caps() {
        let response = SeriesResponse {
            rows: (0..5)
                .map(|i| {
                    Row::new(format!("2024-01-0{}", i + 1))
                        .with_value("A", Some(i as f64))
                        .with_value("B", Some(1.0))
                })
                .collect(),
            field_labels: [("A", "Alpha"), ("B", "Beta")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            object_label: None,
        };

        let selected = select(response, &request(&["A"], Some(2)));
        assert_eq!(selected.rows.len(), 2);
        assert_eq!(selected.rows[0].x, "2024-01-04");
        assert_eq!(selected.rows[1].metric("A"), Some(4.0));
        assert!(!selected.rows[0].values.contains_key("B"));
        assert_eq!(selected.field_labels.len(), 1);
    }

    #[tokio::test]
    async fn test_file_service_reads_bare_rows() {
        let path = write_temp(
            "bare.json",
            r#"[{"x":"2024-01-01","Id":"a01","A":1,"B":2},{"x":"2024-01-02","A":3}]"#,
        );
        let service = JsonFileService::new(&path);

        let response = service.fetch_series(&request(&["B", "A"], None)).await.unwrap();
        assert_eq!(response.rows.len(), 2);
        assert_eq!(response.rows[0].metric("B"), Some(2.0));
        assert_eq!(response.rows[1].metric("B"), None);
        assert!(response.field_labels.is_empty());
    }

    #[tokio::test]
    async fn test_file_service_reads_full_response() {
        let path = write_temp(
            "full.json",
            r#"{"rows":[{"x":"2024-01-01","A":1}],"fieldLabels":{"A":"Alpha"},"objectLabel":"Reading"}"#,
        );
        let response = JsonFileService::new(&path)
            .fetch_series(&request(&["A"], None))
            .await
            .unwrap();
        assert_eq!(response.object_label.as_deref(), Some("Reading"));
        assert_eq!(response.field_labels.get("A").map(String::as_str), Some("Alpha"));
    }

    #[tokio::test]
    async fn test_file_service_errors() {
        let missing = JsonFileService::new("/nonexistent/rows.json");
        let err = missing.fetch_series(&request(&["A"], None)).await.unwrap_err();
        assert!(err.display_message().contains("Failed to read data file"));

        let path = write_temp("broken.json", "{ not json");
        let err = JsonFileService::new(&path)
            .fetch_series(&request(&["A"], None))
            .await
            .unwrap_err();
        assert!(err.body.is_some());
        assert!(err.display_message().contains("Invalid data file"));
    }
}
