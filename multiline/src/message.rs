use crate::surface::{HoverEvent, Point};
use crate::timer::TimerToken;

/// Events driving a chart orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    /// Tooltip content requested by the surface on pointer movement.
    Hover(HoverEvent),

    /// Click on the canvas at a pointer position.
    Click(Point),

    /// Pointer entered the tooltip overlay.
    OverlayEnter,

    /// Pointer left the tooltip overlay.
    OverlayLeave,

    /// A hide timer elapsed.
    HideElapsed(TimerToken),

    /// Hide every series.
    HideAll,

    /// Show every series.
    ShowAll,

    /// Fetch rows again and rebuild the chart.
    Redraw,
}
