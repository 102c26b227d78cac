//! Boundary with the rendering surface and its host.
//!
//! The engine never draws, scales or hit-tests. It hands a [`ChartSpec`] to a
//! [`ChartHost`], gets back a [`RenderSurface`], and receives pointer
//! activity as [`crate::message::ChartEvent`]s.

use serde::Serialize;

use multiline_common::Result;

use crate::navigation::NavigationTarget;
use crate::style::SeriesStyle;

/// A position in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// This point moved by (`dx`, `dy`).
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A drawn sample, addressed by series and row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointRef {
    pub series_index: usize,
    pub row_index: usize,
}

impl PointRef {
    pub fn new(series_index: usize, row_index: usize) -> Self {
        Self {
            series_index,
            row_index,
        }
    }
}

/// Tooltip state reported by the surface on pointer movement.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverEvent {
    /// Opacity the surface would give its own tooltip; zero when the
    /// pointer is over no data point.
    pub opacity: f32,
    /// Matched points, the hovered one first.
    pub points: Vec<PointRef>,
    /// Caret position relative to the canvas.
    pub caret: Point,
}

impl HoverEvent {
    /// Hover over `point` at `caret`.
    pub fn over(point: PointRef, caret: Point) -> Self {
        Self {
            opacity: 1.0,
            points: vec![point],
            caret,
        }
    }

    /// Pointer left every data point.
    pub fn left() -> Self {
        Self {
            opacity: 0.0,
            points: Vec::new(),
            caret: Point::ORIGIN,
        }
    }

    /// Whether this event shows a data point.
    pub fn is_active(&self) -> bool {
        self.opacity > 0.0 && !self.points.is_empty()
    }
}

/// Legend placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    Bottom,
}

/// How the surface picks the point under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    Nearest,
    Index,
}

/// Pointer interaction settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interaction {
    pub mode: InteractionMode,
    /// Only match when the pointer is on the point itself.
    pub intersect: bool,
}

/// Category x axis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAxis {
    pub max_rotation: u32,
    pub auto_skip: bool,
    /// Maps a category label to its tick text.
    #[serde(skip)]
    pub tick_format: fn(&str) -> String,
}

/// Linear y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueAxis {
    pub begin_at_zero: bool,
}

/// One drawn series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub field: String,
    /// One value per row; `None` leaves a gap.
    pub data: Vec<Option<f64>>,
    pub style: SeriesStyle,
    pub fill: bool,
    /// Curve tension (0 draws straight segments).
    pub tension: f32,
}

/// Everything a surface needs to draw the chart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub title: String,
    /// Category labels, one per row.
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub x_axis: CategoryAxis,
    pub y_axis: ValueAxis,
    pub legend: LegendPosition,
    pub interaction: Interaction,
    pub responsive: bool,
}

impl ChartSpec {
    /// Text for the category at `index`, through the axis tick formatter.
    pub fn tick_text(&self, index: usize) -> Option<String> {
        self.labels
            .get(index)
            .map(|label| (self.x_axis.tick_format)(label))
    }
}

/// A live chart drawn by a third-party renderer.
pub trait RenderSurface {
    /// Number of series the surface was built with.
    fn series_count(&self) -> usize;

    /// Set the visibility flag of one series. Takes effect on [`redraw`](Self::redraw).
    fn set_series_visible(&mut self, index: usize, visible: bool);

    /// Current visibility flag of one series.
    fn is_series_visible(&self, index: usize) -> bool;

    fn redraw(&mut self);

    /// Release everything the surface holds. The surface is not used afterwards.
    fn destroy(&mut self);

    /// The sample nearest to `pointer`, if any.
    fn nearest_point(&self, pointer: Point) -> Option<PointRef>;

    /// Offset of the canvas inside the container the overlay is attached to.
    fn canvas_origin(&self) -> Point {
        Point::ORIGIN
    }

    /// Map an axis tick value back to its category label.
    ///
    /// Surfaces without this capability keep the default, and the tick value
    /// itself is formatted instead.
    fn label_for_value(&self, _value: f64) -> Option<String> {
        None
    }
}

/// The embedding environment: creates surfaces and performs navigation.
pub trait ChartHost {
    type Surface: RenderSurface;

    /// Build a surface for `spec` inside the host's container.
    fn create_surface(&mut self, spec: ChartSpec) -> Result<Self::Surface>;

    /// Open the destination described by `target`.
    fn navigate(&mut self, target: NavigationTarget);
}
