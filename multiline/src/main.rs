//! Multiline - headless chart renderer.
//!
//! Loads a chart configuration, fetches rows from a JSON file (or generates
//! demo rows), builds the chart against an in-memory surface and prints the
//! series and the tooltip each row would show.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use multiline::mock::{HeadlessHost, MockDataService, sample_rows};
use multiline::surface::{HoverEvent, Point, PointRef};
use multiline::{ChartEvent, ChartOrchestrator, DataService, JsonFileService, TokioHideTimer};
use multiline_common::{AppConfig, SeriesRequest, SeriesResponse, ServiceError};

/// Rows generated in demo mode.
const DEMO_ROWS: usize = 30;

/// Horizontal spacing of rows on the headless canvas.
const ROW_SPACING: f32 = 24.0;

#[derive(Parser, Debug)]
#[command(about = "Headless multi-series line chart renderer")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON file with rows; overrides the configured data path.
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Use generated rows instead of a data file.
    #[arg(long)]
    demo: bool,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

/// Where rows come from.
enum Source {
    File(JsonFileService),
    Demo(MockDataService),
}

impl DataService for Source {
    async fn fetch_series(&self, request: &SeriesRequest) -> Result<SeriesResponse, ServiceError> {
        match self {
            Source::File(service) => service.fetch_series(request).await,
            Source::Demo(service) => service.fetch_series(request).await,
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("multiline").join("chart.json5"))
}

fn demo_config(mut config: AppConfig) -> AppConfig {
    let chart = &mut config.chart;
    chart.title = "Demo Readings".to_string();
    chart.fields_csv.get_or_insert_with(|| "Temperature__c, Humidity__c, Pressure__c".to_string());
    chart.child_object_api_name.get_or_insert_with(|| "Reading__c".to_string());
    chart.date_field_api_name.get_or_insert_with(|| "Reading_Date__c".to_string());
    chart.parent_lookup_path.get_or_insert_with(|| "Station__c".to_string());
    chart.record_id.get_or_insert_with(|| "a00000000000001".to_string());
    config
}

fn load(args: &Args) -> anyhow::Result<AppConfig> {
    let path = args.config.clone().or_else(default_config_path);
    let config = match path {
        Some(path) if args.config.is_some() || path.exists() => {
            multiline_common::load_config(&path).context("Failed to load configuration")?
        }
        _ if args.demo => AppConfig::default(),
        _ => anyhow::bail!("No configuration file found; pass --config or --demo"),
    };
    Ok(if args.demo { demo_config(config) } else { config })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = load(&args)?;

    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    multiline_common::init_tracing(&config.logging)?;

    tracing::info!(title = %config.chart.title, demo = args.demo, "Starting multiline");

    let source = if args.demo {
        let rows = sample_rows(&config.chart.metric_fields(), DEMO_ROWS);
        Source::Demo(MockDataService::with_rows(rows))
    } else {
        let path = args
            .data
            .clone()
            .or_else(|| config.data.path.clone())
            .context("No data file configured; pass --data or set data.path")?;
        Source::File(JsonFileService::new(path))
    };

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let timer = TokioHideTimer::new(&tx);
    let mut chart = ChartOrchestrator::new(config.chart, source, HeadlessHost::new(), timer);

    chart.initialize().await;
    if let Some(message) = chart.error_message() {
        anyhow::bail!(message);
    }

    println!(
        "{} ({} rows)",
        chart.config().title,
        chart.rows().len()
    );
    if let Some(label) = chart.object_label() {
        println!("Object: {label}");
    }
    for series in chart.series() {
        let present = series.values.iter().flatten().count();
        println!(
            "  {} [{}] color {} dash {:?} width {} ({} values)",
            series.label, series.field, series.style.color, series.style.dash, series.style.width, present
        );
    }
    println!();

    for row_index in 0..chart.rows().len() {
        let Some(series_index) = chart
            .series()
            .iter()
            .position(|s| s.values.get(row_index).copied().flatten().is_some())
        else {
            continue;
        };
        let caret = Point::new(row_index as f32 * ROW_SPACING, 0.0);
        let hover = HoverEvent::over(PointRef::new(series_index, row_index), caret);
        chart.handle_event(ChartEvent::Hover(hover)).await;

        if let Some(content) = chart.tooltip().content() {
            print!("{content}");
        }
    }

    tx.send(ChartEvent::Hover(HoverEvent::left()))?;
    drop(tx);
    chart.run(rx).await;

    tracing::info!("Done");
    Ok(())
}
