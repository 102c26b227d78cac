//! Coincident point resolution.
//!
//! Decides which series sit on the same visual point as a hovered sample:
//! same row index and a value within [`COINCIDENT_EPSILON`] of the hovered
//! value. Rows are the only shared index space, so matching is by row index
//! and never by x value.

/// Tolerance below which two values are treated as the same point.
///
/// Comparison is strict: values exactly this far apart are distinct.
pub const COINCIDENT_EPSILON: f64 = 1e-9;

/// A column of index-aligned series values.
pub trait SeriesColumn {
    /// Numeric value at `row`, or `None` when absent or non-numeric.
    fn value_at(&self, row: usize) -> Option<f64>;
}

impl SeriesColumn for [Option<f64>] {
    fn value_at(&self, row: usize) -> Option<f64> {
        self.get(row).copied().flatten().filter(|v| v.is_finite())
    }
}

impl SeriesColumn for Vec<Option<f64>> {
    fn value_at(&self, row: usize) -> Option<f64> {
        self.as_slice().value_at(row)
    }
}

/// A series that matched the hovered point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoincidentPoint {
    /// Index of the series in declaration order.
    pub series_index: usize,
    /// The series' value at the hovered row.
    pub value: f64,
}

/// Find every series whose value at `row` is within `epsilon` of `target`.
///
/// Results follow series declaration order.
pub fn resolve<S: SeriesColumn>(
    matrix: &[S],
    row: usize,
    target: f64,
    epsilon: f64,
) -> Vec<CoincidentPoint> {
    matrix
        .iter()
        .enumerate()
        .filter_map(|(series_index, column)| {
            let value = column.value_at(row)?;
            ((value - target).abs() < epsilon).then_some(CoincidentPoint {
                series_index,
                value,
            })
        })
        .collect()
}
