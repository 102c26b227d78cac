//! Test doubles and generated demo data.
//!
//! Lets the orchestrator run without a renderer, a remote data service or a
//! wall clock: an in-memory host and surface, a scripted data service, a
//! manually driven hide timer, and random-walk sample rows.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use chrono::{Days, NaiveDate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use multiline_common::{Error, Result, Row, SeriesRequest, SeriesResponse, ServiceError};

use crate::navigation::NavigationTarget;
use crate::service::DataService;
use crate::surface::{ChartHost, ChartSpec, Point, PointRef, RenderSurface};
use crate::timer::{HideTimer, TimerToken};

/// Data service returning a scripted outcome and recording every request.
#[derive(Debug)]
pub struct MockDataService {
    outcome: RefCell<std::result::Result<SeriesResponse, ServiceError>>,
    requests: RefCell<Vec<SeriesRequest>>,
}

impl MockDataService {
    /// Service answering every call with `response`.
    pub fn new(response: SeriesResponse) -> Self {
        Self {
            outcome: RefCell::new(Ok(response)),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Service rejecting every call with `error`.
    pub fn failing(error: ServiceError) -> Self {
        Self {
            outcome: RefCell::new(Err(error)),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Service answering with the given rows and no labels.
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self::new(SeriesResponse {
            rows,
            ..SeriesResponse::default()
        })
    }

    pub fn set_response(&self, response: SeriesResponse) {
        *self.outcome.borrow_mut() = Ok(response);
    }

    pub fn fail_with(&self, error: ServiceError) {
        *self.outcome.borrow_mut() = Err(error);
    }

    /// Number of fetches made so far.
    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<SeriesRequest> {
        self.requests.borrow().last().cloned()
    }
}

impl DataService for MockDataService {
    async fn fetch_series(
        &self,
        request: &SeriesRequest,
    ) -> std::result::Result<SeriesResponse, ServiceError> {
        self.requests.borrow_mut().push(request.clone());
        self.outcome.borrow().clone()
    }
}

/// Hide timer that never fires on its own.
///
/// Tests deliver elapsed tokens by hand and inspect what is armed.
#[derive(Debug, Default)]
pub struct ManualHideTimer {
    armed: BTreeMap<TimerToken, Duration>,
    armed_count: usize,
}

impl ManualHideTimer {
    /// Delay of a live timer.
    pub fn armed_delay(&self, token: TimerToken) -> Option<Duration> {
        self.armed.get(&token).copied()
    }

    /// Timers armed and not yet disarmed, oldest first.
    pub fn live(&self) -> Vec<TimerToken> {
        self.armed.keys().copied().collect()
    }

    /// Total number of arm calls.
    pub fn armed_count(&self) -> usize {
        self.armed_count
    }
}

impl HideTimer for ManualHideTimer {
    fn arm(&mut self, token: TimerToken, delay: Duration) {
        self.armed.insert(token, delay);
        self.armed_count += 1;
    }

    fn disarm(&mut self, token: TimerToken) {
        self.armed.remove(&token);
    }
}

/// In-memory rendering surface.
///
/// Hit-testing goes through a table of known sample positions: the entry
/// closest to the pointer wins.
#[derive(Debug)]
pub struct HeadlessSurface {
    spec: Option<ChartSpec>,
    visible: Vec<bool>,
    redraws: usize,
    destroyed: bool,
    points: Vec<(Point, PointRef)>,
    origin: Point,
    destroy_count: Rc<Cell<usize>>,
}

impl HeadlessSurface {
    /// A bare surface with `count` visible series and no chart spec.
    pub fn with_series(count: usize) -> Self {
        Self {
            spec: None,
            visible: vec![true; count],
            redraws: 0,
            destroyed: false,
            points: Vec::new(),
            origin: Point::ORIGIN,
            destroy_count: Rc::default(),
        }
    }

    fn from_spec(spec: ChartSpec, origin: Point, destroy_count: Rc<Cell<usize>>) -> Self {
        Self {
            visible: vec![true; spec.datasets.len()],
            spec: Some(spec),
            origin,
            destroy_count,
            ..Self::with_series(0)
        }
    }

    pub fn spec(&self) -> Option<&ChartSpec> {
        self.spec.as_ref()
    }

    pub fn redraws(&self) -> usize {
        self.redraws
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Register a sample drawn at `at`.
    pub fn set_nearest(&mut self, at: Point, point: PointRef) {
        self.points.push((at, point));
    }

    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.origin = origin;
    }
}

impl RenderSurface for HeadlessSurface {
    fn series_count(&self) -> usize {
        self.visible.len()
    }

    fn set_series_visible(&mut self, index: usize, visible: bool) {
        if let Some(flag) = self.visible.get_mut(index) {
            *flag = visible;
        }
    }

    fn is_series_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }

    fn redraw(&mut self) {
        self.redraws += 1;
    }

    fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.destroy_count.set(self.destroy_count.get() + 1);
        }
    }

    fn nearest_point(&self, pointer: Point) -> Option<PointRef> {
        let distance = |p: &Point| {
            let (dx, dy) = (p.x - pointer.x, p.y - pointer.y);
            dx * dx + dy * dy
        };
        self.points
            .iter()
            .min_by(|a, b| distance(&a.0).total_cmp(&distance(&b.0)))
            .map(|(_, point)| *point)
    }

    fn canvas_origin(&self) -> Point {
        self.origin
    }

    fn label_for_value(&self, value: f64) -> Option<String> {
        if value < 0.0 || value.fract() != 0.0 {
            return None;
        }
        self.spec.as_ref()?.labels.get(value as usize).cloned()
    }
}

/// In-memory host creating [`HeadlessSurface`]s and recording navigation.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    specs: Vec<ChartSpec>,
    navigations: Vec<NavigationTarget>,
    failure: Option<String>,
    canvas_origin: Point,
    destroyed: Rc<Cell<usize>>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `create_surface` calls fail with `message`.
    pub fn fail_with(&mut self, message: impl Into<String>) {
        self.failure = Some(message.into());
    }

    pub fn clear_failure(&mut self) {
        self.failure = None;
    }

    /// Canvas origin given to new surfaces.
    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.canvas_origin = origin;
    }

    /// Specs of every surface created, oldest first.
    pub fn specs(&self) -> &[ChartSpec] {
        &self.specs
    }

    pub fn last_spec(&self) -> Option<&ChartSpec> {
        self.specs.last()
    }

    pub fn created(&self) -> usize {
        self.specs.len()
    }

    /// Number of surfaces from this host that were destroyed.
    pub fn destroyed(&self) -> usize {
        self.destroyed.get()
    }

    pub fn navigations(&self) -> &[NavigationTarget] {
        &self.navigations
    }
}

impl ChartHost for HeadlessHost {
    type Surface = HeadlessSurface;

    fn create_surface(&mut self, spec: ChartSpec) -> Result<HeadlessSurface> {
        if let Some(message) = &self.failure {
            return Err(Error::surface(message.clone()));
        }
        self.specs.push(spec.clone());
        Ok(HeadlessSurface::from_spec(
            spec,
            self.canvas_origin,
            Rc::clone(&self.destroyed),
        ))
    }

    fn navigate(&mut self, target: NavigationTarget) {
        tracing::debug!(href = %target.href(), "Navigate");
        self.navigations.push(target);
    }
}

/// First date of generated sample rows.
const SAMPLE_START: (i32, u32, u32) = (2024, 1, 1);

/// Every this many rows, all series share one value.
const COINCIDENT_EVERY: usize = 7;

/// Generate `count` daily sample rows for `fields`.
pub fn sample_rows(fields: &[String], count: usize) -> Vec<Row> {
    sample_rows_with(&mut SmallRng::from_os_rng(), fields, count)
}

/// Generate sample rows from a caller-provided random source.
///
/// Each field follows its own random walk; about one value in twenty is left
/// empty, and every seventh row puts all series on the same value.
pub fn sample_rows_with<R: Rng>(rng: &mut R, fields: &[String], count: usize) -> Vec<Row> {
    let Some(start) = NaiveDate::from_ymd_opt(SAMPLE_START.0, SAMPLE_START.1, SAMPLE_START.2)
    else {
        return Vec::new();
    };

    let mut levels: Vec<f64> = fields
        .iter()
        .map(|_| rng.random_range(20.0..80.0_f64).round())
        .collect();

    let mut rows = Vec::with_capacity(count);
    for i in 0..count {
        let Some(date) = start.checked_add_days(Days::new(i as u64)) else {
            break;
        };
        let mut row = Row::new(date.format("%Y-%m-%d").to_string())
            .with_record_id(format!("a01{:015}", i + 1))
            .with_name(format!("R-{:04}", i + 1));

        for level in levels.iter_mut() {
            *level = (*level + rng.random_range(-5.0..5.0_f64)).max(0.0);
            *level = (*level * 10.0).round() / 10.0;
        }

        let shared = (i % COINCIDENT_EVERY == 0).then(|| levels.first().copied()).flatten();
        for (field, level) in fields.iter().zip(&levels) {
            let value = match shared {
                Some(v) => Some(v),
                None if rng.random_bool(0.05) => None,
                None => Some(*level),
            };
            row = row.with_value(field.as_str(), value);
        }
        rows.push(row);
    }
    rows
}
