use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::broadcast;

use weatherdash_core::Config;
use weatherdash_ui::{ChartView, Dashboard, StoreEvent};
use weatherdash_weather::{MetricType, MockWeatherSource, RandomGenerator, WeatherSource};

#[derive(Parser)]
#[command(name = "weatherdash", author, version, about = "Weather dashboard backed by mock data", long_about = None)]
struct Cli {
    /// Location to show instead of the configured default
    #[arg(short, long)]
    location: Option<String>,

    /// Metric to chart: temperature, rainfall, soil-temperature, soil-moisture
    #[arg(short, long, default_value = "temperature")]
    metric: MetricType,

    /// Search known locations and print the matches
    #[arg(short, long)]
    search: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Keep running and print every update until Ctrl-C
    #[arg(short, long)]
    watch: bool,

    /// Config file to use instead of the default one
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, validation) =
        Config::load_validated(cli.config.as_deref()).context("Failed to load configuration")?;
    weatherdash_core::init_logging(&config.logging.filter)?;
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }

    if let Some(location) = cli.location {
        config.dashboard.default_location = location;
    }
    let source = Arc::new(mock_source(&config));

    if let Some(query) = cli.search {
        return search(source.as_ref(), &query, cli.json).await;
    }

    let mut dashboard = Dashboard::new(config, source);
    dashboard.select_metric(cli.metric);

    let mut events = dashboard.store().subscribe();
    dashboard.start();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            dashboard.shutdown().await;
            return Ok(());
        }
        _ = next_update(&mut events) => {}
    }
    render(&dashboard, cli.json)?;

    if cli.watch {
        tracing::info!("Watching for updates, press Ctrl-C to stop");
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                open = next_update(&mut events) => {
                    if !open {
                        break;
                    }
                    render(&dashboard, cli.json)?;
                }
            }
        }
    }

    dashboard.shutdown().await;
    Ok(())
}

fn mock_source(config: &Config) -> MockWeatherSource {
    let generator = match config.mock.seed {
        Some(seed) => RandomGenerator::seeded(seed),
        None => RandomGenerator::new(),
    };
    MockWeatherSource::new(Arc::new(generator))
        .with_delays(
            Duration::from_millis(config.mock.fetch_delay_ms),
            Duration::from_millis(config.mock.search_delay_ms),
        )
        .with_max_results(config.search.max_results)
        .with_min_query_len(config.search.min_query_len)
}

/// Wait until a fetch finishes; false once the store is gone
async fn next_update(events: &mut broadcast::Receiver<StoreEvent>) -> bool {
    loop {
        match events.recv().await {
            Ok(StoreEvent::LoadingChanged(false)) => return true,
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!("Skipped {} store events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => return false,
        }
    }
}

async fn search(source: &dyn WeatherSource, query: &str, json: bool) -> Result<()> {
    let results = source
        .search_locations(query)
        .await
        .context("Location search failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No locations found for \"{}\"", query);
        return Ok(());
    }
    for location in &results {
        println!("{}", location);
    }
    println!(
        "{} location{} found",
        results.len(),
        if results.len() == 1 { "" } else { "s" }
    );
    Ok(())
}

fn render(dashboard: &Dashboard, json: bool) -> Result<()> {
    if json {
        let state = dashboard.store().snapshot();
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    let summary = dashboard.summary();
    println!("{}", summary.location);
    if let Some(date) = &summary.date {
        println!("{}", date);
    }
    if let (Some(temp), Some(rain)) = (&summary.current_temp, &summary.current_rainfall) {
        println!("Temperature: {}   Rainfall: {}", temp, rain);
    }

    let selector: Vec<String> = summary
        .metrics
        .iter()
        .map(|m| {
            if m.selected {
                format!("[{}]", m.label)
            } else {
                m.label.to_string()
            }
        })
        .collect();
    println!("\n{}", selector.join("  "));

    match dashboard.chart() {
        ChartView::Ready(chart) => {
            println!("{} ({})", chart.title, chart.unit);
            for point in &chart.points {
                println!("  {:<8} {}", point.label, chart.tooltip(point.value));
            }
            println!(
                "  min {}  max {}",
                chart.tooltip(chart.min),
                chart.tooltip(chart.max)
            );
        }
        ChartView::NoData => println!("No chart data available"),
        ChartView::Loading => {
            let message = dashboard
                .query()
                .and_then(|q| q.error_message())
                .unwrap_or("Loading...");
            println!("{}", message);
        }
    }

    if let Some(line) = &summary.last_updated {
        println!("\n{}", line);
    }
    Ok(())
}
