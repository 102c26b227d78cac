//! Combined tooltip overlay.
//!
//! The overlay replaces the surface's own tooltip. It lists every series
//! coincident with the hovered sample, stays up briefly after the pointer
//! leaves the data so it can be reached, and is pinned while the pointer is
//! on it.
//!
//! ```text
//!            hover(active)                 pointer enter
//!   Hidden ───────────────▶ Visible ───────────────────▶ Pinned
//!     ▲                       │  hover(inactive): arm       │
//!     │   hide timer elapsed  │                             │
//!     └───────────────────────┘◀────── pointer leave ───────┘
//! ```

use std::fmt;
use std::time::Duration;

use multiline_common::Row;

use crate::coincident::{COINCIDENT_EPSILON, SeriesColumn, resolve};
use crate::formatting::{format_date_time, format_value};
use crate::navigation::NavigationTarget;
use crate::series::SeriesDefinition;
use crate::surface::{HoverEvent, Point};
use crate::timer::{HideTimer, TimerToken};

/// Delay between the pointer leaving the data and the overlay hiding.
pub const HIDE_DELAY: Duration = Duration::from_millis(250);

/// Offset from the caret to the overlay's top-left corner, in pixels.
pub const ANCHOR_OFFSET: (f32, f32) = (12.0, 12.0);

/// Overlay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Hidden,
    Visible,
    Pinned,
}

/// One line of tooltip content.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipEntry {
    /// Swatch color of the series.
    pub color: &'static str,
    pub label: String,
    pub value: f64,
    pub formatted_value: String,
    /// Link to the row's record, when the row has one.
    pub link: Option<String>,
}

/// Header plus the lines for every coincident series.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    /// Date-time label of the hovered row.
    pub title: String,
    pub entries: Vec<TooltipEntry>,
}

impl TooltipContent {
    /// More than one series shares the hovered point.
    pub fn is_combined(&self) -> bool {
        self.entries.len() > 1
    }

    /// Build content for the hovered point of `event`.
    ///
    /// Returns `None` when the hovered series has no numeric value at the
    /// hovered row.
    pub fn for_hover(
        event: &HoverEvent,
        series: &[SeriesDefinition],
        rows: &[Row],
    ) -> Option<Self> {
        let hovered = event.points.first()?;
        let row = rows.get(hovered.row_index)?;
        let target = series.get(hovered.series_index)?.value_at(hovered.row_index)?;

        let link = row
            .record_id
            .as_deref()
            .map(|id| NavigationTarget::record_page(id).href());

        let entries = resolve(series, hovered.row_index, target, COINCIDENT_EPSILON)
            .into_iter()
            .map(|point| {
                let s = &series[point.series_index];
                TooltipEntry {
                    color: s.style.color,
                    label: s.label.clone(),
                    value: point.value,
                    formatted_value: format_value(point.value),
                    link: link.clone(),
                }
            })
            .collect();

        Some(Self {
            title: format_date_time(&row.x),
            entries,
        })
    }
}

impl fmt::Display for TooltipContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for entry in &self.entries {
            let bullet = if self.is_combined() { "-" } else { "\u{25cf}" };
            write!(f, "{bullet} {}: {}", entry.label, entry.formatted_value)?;
            if let Some(link) = &entry.link {
                write!(f, " <{link}>")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The overlay element attached to the chart container.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayElement {
    pub content: TooltipContent,
    /// Top-left corner relative to the container.
    pub position: Point,
    pub displayed: bool,
}

/// Tooltip overlay state machine.
#[derive(Debug)]
pub struct TooltipOverlay<T: HideTimer> {
    state: OverlayState,
    /// Created on first hover, then reused.
    element: Option<OverlayElement>,
    /// The only live hide timer, if any.
    hide_timer: Option<TimerToken>,
    next_token: u64,
    timer: T,
}

impl<T: HideTimer> TooltipOverlay<T> {
    pub fn new(timer: T) -> Self {
        Self {
            state: OverlayState::Hidden,
            element: None,
            hide_timer: None,
            next_token: 0,
            timer,
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn element(&self) -> Option<&OverlayElement> {
        self.element.as_ref()
    }

    pub fn content(&self) -> Option<&TooltipContent> {
        self.element.as_ref().map(|e| &e.content)
    }

    /// Whether the overlay is currently shown.
    pub fn is_displayed(&self) -> bool {
        self.element.as_ref().is_some_and(|e| e.displayed)
    }

    /// The pending hide timer, if one is armed.
    pub fn pending_hide(&self) -> Option<TimerToken> {
        self.hide_timer
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Handle a tooltip request from the surface.
    pub fn on_hover(
        &mut self,
        event: &HoverEvent,
        series: &[SeriesDefinition],
        rows: &[Row],
        canvas_origin: Point,
    ) {
        let content = if event.is_active() {
            TooltipContent::for_hover(event, series, rows)
        } else {
            None
        };

        let Some(content) = content else {
            self.schedule_hide();
            return;
        };

        self.cancel_hide();

        let position = canvas_origin
            .offset(event.caret.x, event.caret.y)
            .offset(ANCHOR_OFFSET.0, ANCHOR_OFFSET.1);

        match self.element.as_mut() {
            Some(element) => {
                element.content = content;
                element.position = position;
                element.displayed = true;
            }
            None => {
                tracing::debug!("Creating tooltip overlay element");
                self.element = Some(OverlayElement {
                    content,
                    position,
                    displayed: true,
                });
            }
        }

        if self.state == OverlayState::Hidden {
            tracing::trace!("Tooltip visible");
            self.state = OverlayState::Visible;
        }
    }

    /// Pointer entered the overlay element.
    pub fn on_pointer_enter(&mut self) {
        if self.element.is_none() {
            return;
        }
        self.cancel_hide();
        if self.state != OverlayState::Pinned {
            tracing::trace!("Tooltip pinned");
            self.state = OverlayState::Pinned;
        }
    }

    /// Pointer left the overlay element. A pinned overlay hides at once.
    pub fn on_pointer_leave(&mut self) {
        if self.state != OverlayState::Pinned {
            return;
        }
        self.cancel_hide();
        self.hide();
    }

    /// A hide timer elapsed. Tokens other than the live one are stale.
    pub fn on_hide_elapsed(&mut self, token: TimerToken) {
        if self.hide_timer != Some(token) {
            tracing::trace!(token = token.id(), "Ignoring stale hide timer");
            return;
        }
        self.hide_timer = None;
        self.timer.disarm(token);
        if self.state != OverlayState::Pinned {
            self.hide();
        }
    }

    /// Drop the overlay element and any pending timer.
    pub fn teardown(&mut self) {
        self.cancel_hide();
        self.element = None;
        self.state = OverlayState::Hidden;
    }

    fn schedule_hide(&mut self) {
        if self.state != OverlayState::Visible || self.hide_timer.is_some() {
            return;
        }
        self.next_token += 1;
        let token = TimerToken::new(self.next_token);
        self.timer.arm(token, HIDE_DELAY);
        self.hide_timer = Some(token);
    }

    fn cancel_hide(&mut self) {
        if let Some(token) = self.hide_timer.take() {
            self.timer.disarm(token);
        }
    }

    fn hide(&mut self) {
        if let Some(element) = self.element.as_mut() {
            element.displayed = false;
        }
        tracing::trace!("Tooltip hidden");
        self.state = OverlayState::Hidden;
    }
}
