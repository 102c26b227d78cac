//! Multiline - interactive overlay engine for multi-series line charts.
//!
//! The engine sits on top of a third-party rendering surface. It assigns
//! series styles, builds a combined tooltip for coincident points, toggles
//! series visibility and turns clicks into record navigation.
//!
//! This library exposes the core components for embedding and testing.

pub mod coincident;
pub mod formatting;
pub mod message;
pub mod mock;
pub mod navigation;
pub mod orchestrator;
pub mod series;
pub mod service;
pub mod style;
pub mod surface;
pub mod timer;
pub mod tooltip;
pub mod visibility;

// Re-export commonly used types
pub use message::ChartEvent;
pub use orchestrator::ChartOrchestrator;
pub use service::{DataService, JsonFileService};
pub use surface::{ChartHost, ChartSpec, RenderSurface};
pub use timer::{HideTimer, TokioHideTimer};
pub use tooltip::{OverlayState, TooltipOverlay};
