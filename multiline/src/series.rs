//! Series built from a row snapshot.

use std::collections::HashMap;

use multiline_common::Row;

use crate::coincident::SeriesColumn;
use crate::formatting::humanize;
use crate::style::{SeriesStyle, style};

/// One metric's values, aligned to row order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesDefinition {
    /// Field identifier.
    pub field: String,
    /// Display label.
    pub label: String,
    /// One value per row, by row index.
    pub values: Vec<Option<f64>>,
    pub style: SeriesStyle,
}

impl SeriesColumn for SeriesDefinition {
    fn value_at(&self, row: usize) -> Option<f64> {
        self.values.value_at(row)
    }
}

/// Build one series per field, in declared field order.
///
/// Labels come from `field_labels`, falling back to a humanized identifier.
pub fn build_series(
    rows: &[Row],
    fields: &[String],
    field_labels: &HashMap<String, String>,
) -> Vec<SeriesDefinition> {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| SeriesDefinition {
            field: field.clone(),
            label: field_labels
                .get(field)
                .filter(|l| !l.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| humanize(field.as_str())),
            values: rows.iter().map(|r| r.metric(field)).collect(),
            style: style(i),
        })
        .collect()
}
