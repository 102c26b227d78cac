//! Bulk series visibility.

use crate::surface::RenderSurface;

/// Set every series on `surface` to `visible`, then redraw.
///
/// A missing surface makes this a no-op.
pub fn set_all_visible<S: RenderSurface + ?Sized>(surface: Option<&mut S>, visible: bool) {
    let Some(surface) = surface else {
        tracing::debug!(visible, "No chart to toggle series on");
        return;
    };
    let count = surface.series_count();
    for index in 0..count {
        surface.set_series_visible(index, visible);
    }
    surface.redraw();
    tracing::debug!(series = count, visible, "Toggled all series");
}

/// Hide every series.
pub fn hide_all<S: RenderSurface + ?Sized>(surface: Option<&mut S>) {
    set_all_visible(surface, false);
}

/// Show every series.
pub fn show_all<S: RenderSurface + ?Sized>(surface: Option<&mut S>) {
    set_all_visible(surface, true);
}
