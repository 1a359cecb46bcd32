//! Clean a raw layoffs CSV and write the cleaned frame plus metric tables
//!
//! Usage:
//!   cargo run --release --bin clean_layoffs [config.json]
//!
//! Settings come from the optional JSON file, then `LAYOFFS_*` environment
//! variables. Log verbosity follows `RUST_LOG` when set.

use anyhow::{Context, Result};
use layoff_insights::{
    clean_layoffs_with_report, data, trends, DatasetSummary, MetricTables, MetricsEngine,
    PipelineConfig,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let config = load_config()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Configuration:");
    tracing::info!("  input:       {:?}", config.input_path);
    tracing::info!("  output:      {:?}", config.output_path);
    tracing::info!("  metrics dir: {:?}", config.metrics_dir);

    let total_start = Instant::now();

    let raw = data::load_raw_csv(&config.input_path)
        .with_context(|| format!("Failed to load {:?}", config.input_path))?;

    let start = Instant::now();
    let (mut cleaned, report) = clean_layoffs_with_report(&raw).context("Cleaning failed")?;
    tracing::info!("Cleaned {} rows in {:.2?}", report.rows, start.elapsed());

    if let Some(stats) = &report.size_stats {
        tracing::info!(
            "Estimated company size: count={} mean={:.1} min={} max={}",
            stats.count,
            stats.mean,
            stats.min,
            stats.max
        );
    }
    for (category, count) in &report.category_counts {
        tracing::info!("  {:<16} {}", category.label(), count);
    }
    tracing::info!(
        "Null after cleaning: date={} percentage={} funding={}",
        report.null_dates,
        report.null_percentages,
        report.null_funding
    );

    data::write_frame(&mut cleaned, &config.output_path)
        .with_context(|| format!("Failed to write {:?}", config.output_path))?;

    let scoped = config.filter.apply(&cleaned).context("Filtering failed")?;
    if !config.filter.is_empty() {
        tracing::info!("Filter kept {} of {} records", scoped.height(), cleaned.height());
    }

    let summary = DatasetSummary::from_cleaned(&scoped)?;
    tracing::info!(
        "{} layoffs across {} companies in {} countries",
        summary.total_laid_off,
        summary.companies,
        summary.countries
    );
    for year in trends::totals_by_year(&scoped)? {
        tracing::info!("  {}: {}", year.year, year.total_laid_off);
    }
    let changes = trends::period_changes(&scoped)?;
    if let (Some(quarter), Some(qoq)) = (&changes.latest_quarter, changes.quarter_over_quarter) {
        tracing::info!("  {} vs previous quarter: {:+.1}%", quarter, qoq);
    }
    if let (Some(year), Some(yoy)) = (changes.latest_year, changes.year_over_year) {
        tracing::info!("  {} vs previous year: {:+.1}%", year, yoy);
    }

    let start = Instant::now();
    let tables = MetricsEngine::new(&scoped)
        .compute_all_parallel()
        .context("Metric computation failed")?;
    tracing::info!("Computed metric tables in {:.2?}", start.elapsed());

    log_top_rows(&tables, config.top_n);

    for (name, mut frame) in tables.to_frames()? {
        let path = config.metrics_dir.join(format!("{}.csv", name));
        data::write_frame(&mut frame, &path)
            .with_context(|| format!("Failed to write {:?}", path))?;
    }

    tracing::info!("Done in {:.2?}", total_start.elapsed());
    Ok(())
}

fn load_config() -> Result<PipelineConfig> {
    let base = match std::env::args().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            PipelineConfig::load(&path)
                .with_context(|| format!("Failed to load config {:?}", path))?
        }
        None => PipelineConfig::default(),
    };
    Ok(base.with_env_overrides()?)
}

fn log_top_rows(tables: &MetricTables, top_n: usize) {
    tracing::info!(
        "Top {} by efficiency ({} qualifying records):",
        top_n,
        tables.efficiency.qualifying_records
    );
    for row in tables.efficiency.rows.iter().take(top_n) {
        tracing::info!("  {:<30} {:.4}", row.company, row.layoff_efficiency_score);
    }

    tracing::info!("Top {} by instability:", top_n);
    for row in tables.instability.rows.iter().take(top_n) {
        tracing::info!("  {:<30} {}", row.company, row.layoff_instability_score);
    }

    tracing::info!("Top {} by severity:", top_n);
    for row in tables.severity.rows.iter().take(top_n) {
        tracing::info!("  {:<30} {:.2}", row.company, row.layoff_severity_index);
    }

    tracing::info!("Top {} by fragility:", top_n);
    for row in tables.fragility.rows.iter().take(top_n) {
        tracing::info!(
            "  {:<30} {:.2} ({} companies)",
            row.location,
            row.fragility_index,
            row.num_companies
        );
    }
}
