//! Per-series visual style assignment.
//!
//! Colors cycle through a fixed high-contrast palette. Once the palette is
//! exhausted each further pass adds a dash pattern, a point shape and an
//! alternate width, so any series index maps to a stable style.

use serde::Serialize;

/// High-contrast base colors, in assignment order.
pub const PALETTE: [&str; 6] = [
    "#3366CC", "#DC3912", "#FF9900", "#109618", "#990099", "#0099C6",
];

/// Alpha suffix appended to a base color to produce its fill tint.
pub const FILL_ALPHA_SUFFIX: &str = "33";

const SOLID: &[u32] = &[];

/// Dash patterns for cycles after the first.
const DASH_PATTERNS: [&[u32]; 4] = [&[6, 4], &[2, 3], &[10, 4, 2, 4], &[8, 6]];

/// Point shapes for cycles after the first.
const POINT_SHAPES: [PointShape; 5] = [
    PointShape::Triangle,
    PointShape::Rect,
    PointShape::RectRot,
    PointShape::Cross,
    PointShape::Star,
];

const BASE_WIDTH: f32 = 2.0;
const BASE_POINT_RADIUS: f32 = 3.0;
/// (line width, point radius) keyed by `cycle % 2`.
const ALTERNATE_SIZES: [(f32, f32); 2] = [(1.5, 3.0), (2.5, 4.0)];
const HOVER_RADIUS_GROWTH: f32 = 2.0;

/// Marker drawn at each sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PointShape {
    Circle,
    Triangle,
    Rect,
    RectRot,
    Cross,
    Star,
}

/// Visual style of one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStyle {
    /// Stroke color (`#RRGGBB`).
    pub color: &'static str,
    /// Fill tint (`#RRGGBBAA`), reserved for area styling.
    pub fill: String,
    /// Dash pattern; empty means solid.
    pub dash: &'static [u32],
    /// Stroke width in pixels.
    pub width: f32,
    /// Marker shape.
    pub point_shape: PointShape,
    /// Marker radius in pixels.
    pub point_radius: f32,
    /// Marker radius while hovered.
    pub hover_radius: f32,
}

impl SeriesStyle {
    /// Whether the line is drawn solid.
    pub fn is_solid(&self) -> bool {
        self.dash.is_empty()
    }
}

/// Style for the series at `index`.
pub fn style(index: usize) -> SeriesStyle {
    let color = PALETTE[index % PALETTE.len()];
    let cycle = index / PALETTE.len();

    let (dash, point_shape, width, point_radius) = if cycle == 0 {
        (SOLID, PointShape::Circle, BASE_WIDTH, BASE_POINT_RADIUS)
    } else {
        let (width, radius) = ALTERNATE_SIZES[cycle % 2];
        (
            DASH_PATTERNS[(cycle - 1) % DASH_PATTERNS.len()],
            POINT_SHAPES[(cycle - 1) % POINT_SHAPES.len()],
            width,
            radius,
        )
    };

    SeriesStyle {
        color,
        fill: format!("{color}{FILL_ALPHA_SUFFIX}"),
        dash,
        width,
        point_shape,
        point_radius,
        hover_radius: point_radius + HOVER_RADIUS_GROWTH,
    }
}
