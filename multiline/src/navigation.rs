//! Navigation requests produced by chart clicks.

use serde::Serialize;

/// Page type for a standard record detail view.
pub const RECORD_PAGE: &str = "standard__recordPage";

/// Page action requested on the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageAction {
    View,
}

impl PageAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageAction::View => "view",
        }
    }
}

/// A destination reference handed to the host for navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTarget {
    #[serde(rename = "type")]
    pub page_type: &'static str,
    pub record_id: String,
    pub action: PageAction,
}

impl NavigationTarget {
    /// Standard detail view of `record_id`.
    pub fn record_page(record_id: impl Into<String>) -> Self {
        Self {
            page_type: RECORD_PAGE,
            record_id: record_id.into(),
            action: PageAction::View,
        }
    }

    /// Relative link to the destination.
    pub fn href(&self) -> String {
        format!("/lightning/r/{}/{}", self.record_id, self.action.as_str())
    }
}
