// Pipeline integration tests
//
// Raw CSV on disk -> load -> clean -> write -> metrics, through the public API only.
// Run with: cargo test --test pipeline_integration_tests

use approx::assert_relative_eq;
use layoff_insights::schema::*;
use layoff_insights::utils::text_values;
use layoff_insights::{
    clean_layoffs, clean_layoffs_with_report, data, trends, LayoffFilter, MetricsEngine,
    SizeCategory,
};
use polars::prelude::*;
use std::fs;
use std::path::Path;

const RAW_CSV: &str = "\
company,location,country,industry,stage,date,date_added,total_laid_off,percentage_laid_off,funds_raised
Acme,SF Bay Area,United States,Retail,Series B,2023-03-15,2023-03-16 09:30:00,100,10%,$5M
Acme,SF Bay Area,United States,Retail,Series B,2023-01-15,2023-01-16,40,4%,\"$5,000,000\"
Acme,New York City,United States,Retail,Series B,2023-02-20,,,,$5M
Acme,SF Bay Area,United States,Retail,Series B,2023-04-01,,60,,$5M
Globex,Toronto,Canada,Fintech,IPO,3/1/2022,,6000,100%,$2B
Initech,,,,,not a date,,12,nan,abc
";

fn write_raw(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("layoffs.csv");
    fs::write(&path, RAW_CSV).unwrap();
    path
}

fn column_text(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    text_values(df, name, "test").unwrap()
}

#[test]
fn test_end_to_end_single_record() {
    let dir = tempfile::tempdir().unwrap();
    let raw = data::load_raw_csv(&write_raw(dir.path())).unwrap();
    let cleaned = clean_layoffs(&raw).unwrap();

    assert_eq!(cleaned.height(), 6);

    let pct = cleaned.column(PERCENTAGE_LAID_OFF).unwrap().f64().unwrap().get(0);
    let funds = cleaned.column(FUNDS_RAISED_CLEAN).unwrap().f64().unwrap().get(0);
    let size = cleaned.column(ESTIMATED_COMPANY_SIZE).unwrap().i64().unwrap().get(0);
    assert_eq!(pct, Some(10.0));
    assert_eq!(funds, Some(5_000_000.0));
    assert_eq!(size, Some(1000));

    assert_eq!(column_text(&cleaned, COMPANY_SIZE_CATEGORY)[0].as_deref(), Some("Mid (500–4999)"));
    assert_eq!(column_text(&cleaned, YEAR)[0].as_deref(), Some("2023"));
    assert_eq!(column_text(&cleaned, QUARTER)[0].as_deref(), Some("2023Q1"));
    assert_eq!(cleaned.column(DATE).unwrap().dtype(), &DataType::Date);
}

#[test]
fn test_degraded_record_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let raw = data::load_raw_csv(&write_raw(dir.path())).unwrap();
    let (cleaned, report) = clean_layoffs_with_report(&raw).unwrap();

    // Initech: every parseable field failed, the row still survives
    let last = cleaned.height() - 1;
    assert_eq!(column_text(&cleaned, COMPANY)[last].as_deref(), Some("Initech"));
    assert_eq!(column_text(&cleaned, DATE)[last], None);
    assert_eq!(column_text(&cleaned, YEAR)[last], None);
    assert_eq!(column_text(&cleaned, FUNDS_RAISED_CLEAN)[last], None);
    assert_eq!(column_text(&cleaned, COUNTRY)[last].as_deref(), Some(UNKNOWN));
    assert_eq!(column_text(&cleaned, LOCATION)[last].as_deref(), Some(UNKNOWN));
    assert_eq!(column_text(&cleaned, COMPANY_SIZE_CATEGORY)[last].as_deref(), Some("Unknown"));

    assert_eq!(report.rows, 6);
    assert_eq!(report.null_dates, 1);
    // Globex: 6000 / 1.0 = 6000
    assert_eq!(report.count_for(SizeCategory::Large), 1);
    assert_eq!(report.count_for(SizeCategory::Mid), 2);
    assert_eq!(report.count_for(SizeCategory::Unknown), 3);
}

#[test]
fn test_cleaning_survives_csv_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let raw = data::load_raw_csv(&write_raw(dir.path())).unwrap();
    let mut once = clean_layoffs(&raw).unwrap();

    let out = dir.path().join("out/Cleaned_layoffs.csv");
    data::write_frame(&mut once, &out).unwrap();

    let reloaded = data::read_csv_as_text(&out).unwrap();
    let twice = clean_layoffs(&reloaded).unwrap();

    for column in [
        DATE,
        PERCENTAGE_LAID_OFF,
        TOTAL_LAID_OFF,
        FUNDS_RAISED_CLEAN,
        YEAR,
        QUARTER,
        ESTIMATED_COMPANY_SIZE,
        COMPANY_SIZE_CATEGORY,
        COUNTRY,
        LOCATION,
    ] {
        assert_eq!(
            column_text(&once, column),
            column_text(&twice, column),
            "column {column} changed on re-clean"
        );
    }
}

#[test]
fn test_metrics_from_cleaned_file() {
    let dir = tempfile::tempdir().unwrap();
    let raw = data::load_raw_csv(&write_raw(dir.path())).unwrap();
    let cleaned = clean_layoffs(&raw).unwrap();
    let tables = MetricsEngine::new(&cleaned).compute_all_parallel().unwrap();

    // Efficiency: Acme rows 1-2 and Globex qualify
    assert_eq!(tables.efficiency.qualifying_records, 3);
    let acme = tables.efficiency.rows.iter().find(|r| r.company == "Acme").unwrap();
    assert_eq!(acme.total_laid_off, 140);
    // Row scores: (100 / 5) / 10 = 2.0 and (40 / 5) / 4 = 2.0
    assert_relative_eq!(acme.layoff_efficiency_score, 2.0, epsilon = 1e-12);
    assert_relative_eq!(acme.layoffs_per_million, 14.0, epsilon = 1e-12);

    // Instability: Acme has Q1 (Jan, Feb, Mar) and Q2 (Apr)
    assert_eq!(tables.instability.score_for("Acme"), Some(2));
    assert_eq!(tables.instability.score_for("Globex"), Some(1));
    assert_eq!(tables.instability.score_for("Initech"), None);

    // Severity: Globex 100 * ln(6001) outranks Acme
    assert_eq!(tables.severity.rows[0].company, "Globex");
    assert_relative_eq!(
        tables.severity.index_for("Globex").unwrap(),
        100.0 * 6001f64.ln(),
        epsilon = 1e-9
    );
    let acme_severity = (10.0 * 101f64.ln() + 4.0 * 41f64.ln()) / 2.0;
    assert_relative_eq!(tables.severity.index_for("Acme").unwrap(), acme_severity, epsilon = 1e-9);

    // Every table renders and writes
    for (name, mut frame) in tables.to_frames().unwrap() {
        let path = dir.path().join("metrics").join(format!("{name}.csv"));
        data::write_frame(&mut frame, &path).unwrap();
        assert!(path.exists());
    }
}

#[test]
fn test_filtered_metrics_and_trends() {
    let dir = tempfile::tempdir().unwrap();
    let raw = data::load_raw_csv(&write_raw(dir.path())).unwrap();
    let cleaned = clean_layoffs(&raw).unwrap();

    let scoped = LayoffFilter::new().with_years([2023]).apply(&cleaned).unwrap();
    assert_eq!(scoped.height(), 4);

    let tables = MetricsEngine::new(&scoped).compute_all().unwrap();
    let companies: Vec<&str> = tables.severity.rows.iter().map(|r| r.company.as_str()).collect();
    assert_eq!(companies, vec!["Acme"]);

    let quarters = trends::totals_by_quarter(&cleaned).unwrap();
    let labels: Vec<&str> = quarters.iter().map(|q| q.quarter.as_str()).collect();
    assert_eq!(labels, vec!["2022Q1", "2023Q1", "2023Q2"]);
    assert_eq!(quarters[1].total_laid_off, 140);
}

#[test]
fn test_missing_column_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.csv");
    fs::write(&path, "company,date\nAcme,2023-01-01\n").unwrap();

    let err = data::load_raw_csv(&path).unwrap_err();
    assert!(err.to_string().contains("missing required column"));
}
