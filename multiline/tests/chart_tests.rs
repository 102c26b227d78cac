//! End-to-end tests driving the orchestrator with in-memory collaborators.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::time::Instant;

use multiline::mock::{HeadlessHost, ManualHideTimer, MockDataService};
use multiline::navigation::NavigationTarget;
use multiline::surface::{HoverEvent, Point, PointRef, RenderSurface};
use multiline::tooltip::HIDE_DELAY;
use multiline::{
    ChartEvent, ChartOrchestrator, HideTimer, JsonFileService, OverlayState, TokioHideTimer,
};
use multiline_common::{
    ChartConfig, Error, MISSING_PARAMETERS, Row, SeriesResponse, ServiceError,
};

fn config() -> ChartConfig {
    ChartConfig {
        title: "Readings".to_string(),
        fields_csv: Some("A,B".to_string()),
        child_object_api_name: Some("Reading__c".to_string()),
        date_field_api_name: Some("Date__c".to_string()),
        parent_lookup_path: Some("Account__c".to_string()),
        record_id: Some("001".to_string()),
        ..ChartConfig::default()
    }
}

fn rows() -> Vec<Row> {
    vec![
        Row::new("2024-01-01")
            .with_record_id("a01")
            .with_value("A", Some(10.0))
            .with_value("B", Some(10.0)),
        Row::new("2024-01-02")
            .with_value("A", Some(5.0))
            .with_value("B", Some(20.0)),
    ]
}

fn chart<T: HideTimer>(
    data: MockDataService,
    timer: T,
) -> ChartOrchestrator<MockDataService, HeadlessHost, T> {
    ChartOrchestrator::new(config(), data, HeadlessHost::new(), timer)
}

fn hover(series_index: usize, row_index: usize) -> ChartEvent {
    ChartEvent::Hover(HoverEvent::over(
        PointRef::new(series_index, row_index),
        Point::new(40.0, 20.0),
    ))
}

fn tooltip_labels<T: HideTimer>(
    chart: &ChartOrchestrator<MockDataService, HeadlessHost, T>,
) -> Vec<String> {
    chart
        .tooltip()
        .content()
        .map(|c| c.entries.iter().map(|e| e.label.clone()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_series_and_coincident_tooltips() {
    let mut chart = chart(MockDataService::with_rows(rows()), ManualHideTimer::default());
    chart.initialize().await;

    let series = chart.series();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].values, vec![Some(10.0), Some(5.0)]);
    assert_eq!(series[1].values, vec![Some(10.0), Some(20.0)]);

    chart.handle_event(hover(0, 0)).await;
    assert_eq!(tooltip_labels(&chart), vec!["A", "B"]);
    assert!(chart.tooltip().content().unwrap().is_combined());

    chart.handle_event(hover(1, 1)).await;
    assert_eq!(tooltip_labels(&chart), vec!["B"]);

    chart.handle_event(hover(0, 1)).await;
    assert_eq!(tooltip_labels(&chart), vec!["A"]);
}

#[tokio::test]
async fn test_missing_record_id_skips_fetch() {
    let mut cfg = config();
    cfg.record_id = None;
    let mut chart = ChartOrchestrator::new(
        cfg,
        MockDataService::with_rows(rows()),
        HeadlessHost::new(),
        ManualHideTimer::default(),
    );
    chart.initialize().await;

    assert!(matches!(chart.error(), Some(Error::Config(_))));
    assert_eq!(chart.error_message().as_deref(), Some(MISSING_PARAMETERS));
    assert_eq!(chart.data().calls(), 0);
    assert_eq!(chart.host().created(), 0);
}

#[tokio::test]
async fn test_fetch_failure_messages() {
    let cases = [
        (ServiceError::with_body("Field is not accessible"), "Field is not accessible"),
        (ServiceError::with_message("Request timed out"), "Request timed out"),
        (ServiceError::other("[object Object]"), "[object Object]"),
    ];

    for (error, expected) in cases {
        let mut chart = chart(MockDataService::failing(error), ManualHideTimer::default());
        chart.initialize().await;

        assert!(matches!(chart.error(), Some(Error::DataFetch(_))));
        assert_eq!(chart.error_message().as_deref(), Some(expected));
        assert!(!chart.has_chart());
        assert_eq!(chart.data().calls(), 1);
    }
}

#[tokio::test]
async fn test_failed_redraw_leaves_no_stale_chart() {
    let mut chart = chart(MockDataService::with_rows(rows()), ManualHideTimer::default());
    chart.initialize().await;
    assert!(chart.has_chart());

    chart
        .data()
        .fail_with(ServiceError::with_message("Service unavailable"));
    chart.handle_event(ChartEvent::Redraw).await;

    assert!(!chart.has_chart());
    assert!(chart.rows().is_empty());
    assert_eq!(chart.host().destroyed(), 1);
    assert_eq!(chart.error_message().as_deref(), Some("Service unavailable"));
}

#[tokio::test]
async fn test_redraw_replaces_surface_and_rows() {
    let mut chart = chart(MockDataService::with_rows(rows()), ManualHideTimer::default());
    chart.initialize().await;

    chart.data().set_response(SeriesResponse {
        rows: vec![Row::new("2024-02-01").with_value("A", Some(1.0))],
        field_labels: HashMap::from([("A".to_string(), "Amount".to_string())]),
        object_label: Some("Reading".to_string()),
    });
    chart.handle_event(ChartEvent::Redraw).await;

    assert_eq!(chart.host().created(), 2);
    assert_eq!(chart.host().destroyed(), 1);
    assert_eq!(chart.rows().len(), 1);
    assert_eq!(chart.series()[0].label, "Amount");
    assert_eq!(chart.series()[1].label, "B");
    assert_eq!(chart.series()[1].values, vec![None]);
    assert_eq!(chart.object_label(), Some("Reading"));

    let spec = chart.host().last_spec().unwrap();
    assert_eq!(spec.title, "Readings");
    assert_eq!(spec.labels, vec!["2024-02-01"]);
}

#[tokio::test]
async fn test_click_navigates_to_row_record() {
    let mut chart = chart(MockDataService::with_rows(rows()), ManualHideTimer::default());
    chart.initialize().await;

    let surface = chart.surface_mut().unwrap();
    surface.set_nearest(Point::new(10.0, 10.0), PointRef::new(0, 0));
    surface.set_nearest(Point::new(90.0, 10.0), PointRef::new(1, 1));

    chart.handle_event(ChartEvent::Click(Point::new(12.0, 30.0))).await;
    assert_eq!(
        chart.host().navigations(),
        &[NavigationTarget::record_page("a01")]
    );

    // The second row has no record.
    chart.handle_event(ChartEvent::Click(Point::new(88.0, 0.0))).await;
    assert_eq!(chart.host().navigations().len(), 1);
}

#[tokio::test]
async fn test_hide_all_then_show_all() {
    let mut chart = chart(MockDataService::with_rows(rows()), ManualHideTimer::default());
    chart.initialize().await;

    chart.handle_event(ChartEvent::HideAll).await;
    let surface = chart.surface().unwrap();
    assert!((0..2).all(|i| !surface.is_series_visible(i)));

    chart.handle_event(ChartEvent::ShowAll).await;
    let surface = chart.surface().unwrap();
    assert!((0..2).all(|i| surface.is_series_visible(i)));
    assert_eq!(surface.redraws(), 2);
}

#[tokio::test]
async fn test_events_without_chart_are_ignored() {
    let mut cfg = config();
    cfg.fields_csv = Some(" , ".to_string());
    let mut chart = ChartOrchestrator::new(
        cfg,
        MockDataService::with_rows(rows()),
        HeadlessHost::new(),
        ManualHideTimer::default(),
    );
    chart.initialize().await;

    chart.handle_event(hover(0, 0)).await;
    chart.handle_event(ChartEvent::Click(Point::ORIGIN)).await;
    chart.handle_event(ChartEvent::HideAll).await;

    assert!(chart.tooltip().element().is_none());
    assert!(chart.host().navigations().is_empty());
}

#[tokio::test]
async fn test_overlay_follows_canvas_origin() {
    let mut host = HeadlessHost::new();
    host.set_canvas_origin(Point::new(8.0, 16.0));
    let mut chart = ChartOrchestrator::new(
        config(),
        MockDataService::with_rows(rows()),
        host,
        ManualHideTimer::default(),
    );
    chart.initialize().await;
    chart.handle_event(hover(0, 0)).await;

    let element = chart.tooltip().element().unwrap();
    assert_eq!(element.position, Point::new(60.0, 48.0));
}

#[tokio::test(start_paused = true)]
async fn test_run_loop_hides_after_delay() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let timer = TokioHideTimer::new(&tx);
    let mut chart = chart(MockDataService::with_rows(rows()), timer);
    chart.initialize().await;

    chart.handle_event(hover(0, 0)).await;
    chart.handle_event(ChartEvent::Hover(HoverEvent::left())).await;
    assert!(chart.tooltip().is_displayed());

    let armed_at = Instant::now();
    let event = rx.recv().await.unwrap();
    assert!(armed_at.elapsed() >= HIDE_DELAY);
    assert!(matches!(event, ChartEvent::HideElapsed(_)));

    chart.handle_event(event).await;
    assert_eq!(chart.tooltip().state(), OverlayState::Hidden);
    assert!(!chart.tooltip().is_displayed());

    tx.send(hover(1, 1)).unwrap();
    tx.send(ChartEvent::OverlayEnter).unwrap();
    drop(tx);
    chart.run(rx).await;

    assert!(!chart.has_chart());
    assert!(chart.tooltip().element().is_none());
    assert_eq!(chart.host().destroyed(), 1);
    assert_eq!(chart.data().calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_pin_before_delay_survives_timer() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut chart = chart(
        MockDataService::with_rows(rows()),
        TokioHideTimer::new(&tx),
    );
    chart.initialize().await;

    chart.handle_event(hover(0, 0)).await;
    chart.handle_event(ChartEvent::Hover(HoverEvent::left())).await;
    chart.handle_event(ChartEvent::OverlayEnter).await;
    assert_eq!(chart.tooltip().state(), OverlayState::Pinned);

    tokio::time::advance(HIDE_DELAY * 4).await;
    tokio::task::yield_now().await;
    assert!(rx.try_recv().is_err());
    assert!(chart.tooltip().is_displayed());

    chart.handle_event(ChartEvent::OverlayLeave).await;
    assert!(!chart.tooltip().is_displayed());
    assert!(chart.tooltip().pending_hide().is_none());
}

#[tokio::test]
async fn test_rows_from_json_file() {
    let dir = std::env::temp_dir().join("multiline-chart-tests");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("rows.json");
    std::fs::write(
        &path,
        r#"{
            "rows": [
                {"x": "2024-01-01T09:00:00Z", "Id": "a01", "Name": "R-1", "A": 3, "B": 3, "C": 1},
                {"x": "2024-01-02T09:00:00Z", "Id": "a02", "Name": "R-2", "A": 4, "B": null}
            ],
            "fieldLabels": {"A": "Alpha"},
            "objectLabel": "Reading"
        }"#,
    )
    .unwrap();

    let mut chart = ChartOrchestrator::new(
        config(),
        JsonFileService::new(&path),
        HeadlessHost::new(),
        ManualHideTimer::default(),
    );
    chart.initialize().await;

    assert!(chart.error().is_none());
    assert_eq!(chart.series()[0].label, "Alpha");
    assert_eq!(chart.series()[1].values, vec![Some(3.0), None]);
    assert!(!chart.rows()[0].values.contains_key("C"));

    chart.handle_event(hover(1, 0)).await;
    let content = chart.tooltip().content().unwrap();
    assert_eq!(content.title, "01/01/2024 9:00 AM");
    assert_eq!(content.entries.len(), 2);
    assert_eq!(content.entries[0].link.as_deref(), Some("/lightning/r/a01/view"));
}
