//! Chart lifecycle and event dispatch.
//!
//! [`ChartOrchestrator`] owns the row snapshot, the live surface and the
//! tooltip overlay. It fetches rows, hands a [`ChartSpec`] to the host, and
//! turns [`ChartEvent`]s into tooltip, visibility and navigation actions.

use tokio::sync::mpsc::UnboundedReceiver;

use multiline_common::{ChartConfig, Error, Result, Row, SeriesRequest};

use crate::formatting::{format_date, tick_label};
use crate::message::ChartEvent;
use crate::navigation::NavigationTarget;
use crate::series::{SeriesDefinition, build_series};
use crate::service::DataService;
use crate::surface::{
    CategoryAxis, ChartHost, ChartSpec, Dataset, HoverEvent, Interaction, InteractionMode,
    LegendPosition, Point, RenderSurface, ValueAxis,
};
use crate::timer::HideTimer;
use crate::tooltip::TooltipOverlay;
use crate::visibility;

/// Curve tension of every line.
pub const LINE_TENSION: f32 = 0.2;

/// Build the surface description for a row snapshot.
pub fn chart_spec(title: &str, rows: &[Row], series: &[SeriesDefinition]) -> ChartSpec {
    ChartSpec {
        title: title.to_string(),
        labels: rows.iter().map(|r| r.x.clone()).collect(),
        datasets: series
            .iter()
            .map(|s| Dataset {
                label: s.label.clone(),
                field: s.field.clone(),
                data: s.values.clone(),
                style: s.style.clone(),
                fill: false,
                tension: LINE_TENSION,
            })
            .collect(),
        x_axis: CategoryAxis {
            max_rotation: 0,
            auto_skip: true,
            tick_format: format_date,
        },
        y_axis: ValueAxis {
            begin_at_zero: true,
        },
        legend: LegendPosition::Bottom,
        interaction: Interaction {
            mode: InteractionMode::Nearest,
            intersect: false,
        },
        responsive: false,
    }
}

/// Drives one embedded chart.
pub struct ChartOrchestrator<D, H: ChartHost, T: HideTimer> {
    config: ChartConfig,
    data: D,
    host: H,
    surface: Option<H::Surface>,
    /// Current snapshot, replaced wholesale on each fetch.
    rows: Vec<Row>,
    series: Vec<SeriesDefinition>,
    object_label: Option<String>,
    tooltip: TooltipOverlay<T>,
    error: Option<Error>,
    initialized: bool,
}

impl<D: DataService, H: ChartHost, T: HideTimer> ChartOrchestrator<D, H, T> {
    pub fn new(config: ChartConfig, data: D, host: H, timer: T) -> Self {
        Self {
            config,
            data,
            host,
            surface: None,
            rows: Vec::new(),
            series: Vec::new(),
            object_label: None,
            tooltip: TooltipOverlay::new(timer),
            error: None,
            initialized: false,
        }
    }

    /// First draw. Later calls do nothing.
    pub async fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        tracing::debug!(config = ?self.config, "Initializing chart");
        self.draw().await;
    }

    /// Fetch rows and rebuild the chart.
    ///
    /// The previous surface is destroyed first. Any failure is stored and
    /// leaves no chart behind.
    pub async fn draw(&mut self) {
        self.destroy_surface();
        self.tooltip.teardown();

        match self.try_draw().await {
            Ok(()) => {
                self.error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "Chart draw failed");
                self.rows.clear();
                self.series.clear();
                self.object_label = None;
                self.error = Some(e);
            }
        }
    }

    async fn try_draw(&mut self) -> Result<()> {
        let request = SeriesRequest::from_config(&self.config)?;

        tracing::info!(
            parent = %request.parent_id,
            object = %request.child_object_api_name,
            fields = request.metric_field_api_names.len(),
            "Fetching chart rows"
        );
        let response = self.data.fetch_series(&request).await?;

        self.rows = response.rows;
        self.object_label = response.object_label;
        self.series = build_series(
            &self.rows,
            &request.metric_field_api_names,
            &response.field_labels,
        );

        let spec = chart_spec(&self.config.title, &self.rows, &self.series);
        self.surface = Some(self.host.create_surface(spec)?);

        tracing::info!(
            rows = self.rows.len(),
            series = self.series.len(),
            "Chart drawn"
        );
        Ok(())
    }

    /// Handle one event.
    pub async fn handle_event(&mut self, event: ChartEvent) {
        match event {
            ChartEvent::Hover(hover) => self.on_hover(&hover),
            ChartEvent::Click(pointer) => self.on_click(pointer),
            ChartEvent::OverlayEnter => self.tooltip.on_pointer_enter(),
            ChartEvent::OverlayLeave => self.tooltip.on_pointer_leave(),
            ChartEvent::HideElapsed(token) => self.tooltip.on_hide_elapsed(token),
            ChartEvent::HideAll => visibility::hide_all(self.surface.as_mut()),
            ChartEvent::ShowAll => visibility::show_all(self.surface.as_mut()),
            ChartEvent::Redraw => self.draw().await,
        }
    }

    /// Draw once, then handle events until every sender is dropped.
    pub async fn run(&mut self, mut events: UnboundedReceiver<ChartEvent>) {
        self.initialize().await;
        while let Some(event) = events.recv().await {
            tracing::trace!(?event, "Chart event");
            self.handle_event(event).await;
        }
        tracing::debug!("Event channel closed");
        self.teardown();
    }

    fn on_hover(&mut self, hover: &HoverEvent) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let origin = surface.canvas_origin();
        self.tooltip
            .on_hover(hover, &self.series, &self.rows, origin);
    }

    fn on_click(&mut self, pointer: Point) {
        let Some(point) = self
            .surface
            .as_ref()
            .and_then(|s| s.nearest_point(pointer))
        else {
            return;
        };
        let Some(record_id) = self
            .rows
            .get(point.row_index)
            .and_then(|row| row.record_id.as_deref())
        else {
            tracing::debug!(row = point.row_index, "Clicked row has no record");
            return;
        };

        let target = NavigationTarget::record_page(record_id);
        tracing::info!(href = %target.href(), "Navigating to record");
        self.host.navigate(target);
    }

    /// Release the surface and the overlay.
    pub fn teardown(&mut self) {
        self.destroy_surface();
        self.tooltip.teardown();
    }

    fn destroy_surface(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            tracing::debug!("Destroying chart surface");
            surface.destroy();
        }
    }

    /// Replace the configuration. Takes effect on the next draw.
    pub fn set_config(&mut self, config: ChartConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Formatted label for an x-axis tick value, when a chart exists.
    pub fn tick_label(&self, value: f64) -> Option<String> {
        self.surface.as_ref().map(|s| tick_label(s, value))
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn series(&self) -> &[SeriesDefinition] {
        &self.series
    }

    pub fn object_label(&self) -> Option<&str> {
        self.object_label.as_deref()
    }

    pub fn tooltip(&self) -> &TooltipOverlay<T> {
        &self.tooltip
    }

    /// The error stored by the last draw, if it failed.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// User-facing text of the stored error.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(Error::user_message)
    }

    pub fn has_chart(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&H::Surface> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut H::Surface> {
        self.surface.as_mut()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn data(&self) -> &D {
        &self.data
    }
}
