//! Cleaning and metric throughput over a synthetic raw frame
//!
//! Run with: cargo bench --bench clean_pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use layoff_insights::{clean_layoffs, MetricsEngine};
use polars::prelude::*;

const COMPANIES: [&str; 8] = ["Acme", "Globex", "Initech", "Umbrella", "Hooli", "Stark", "Wayne", "Tyrell"];
const LOCATIONS: [&str; 4] = ["SF Bay Area", "New York City", "Berlin", "Toronto"];
const FUNDING: [&str; 5] = ["$5M", "$1.2B", "$750,000", "", "unknown"];

fn synthetic_raw(rows: usize) -> DataFrame {
    let pick = |values: &[&str], i: usize| values[i % values.len()].to_string();

    let company: Vec<String> = (0..rows).map(|i| pick(&COMPANIES, i * 7)).collect();
    let location: Vec<String> = (0..rows).map(|i| pick(&LOCATIONS, i)).collect();
    let country: Vec<Option<&str>> = (0..rows).map(|i| (i % 11 != 0).then_some("United States")).collect();
    let industry: Vec<&str> = (0..rows).map(|_| "Retail").collect();
    let stage: Vec<&str> = (0..rows).map(|_| "Series B").collect();
    let date: Vec<String> = (0..rows)
        .map(|i| format!("{}-{:02}-{:02}", 2020 + i % 4, 1 + i % 12, 1 + i % 28))
        .collect();
    let date_added: Vec<String> = date.iter().map(|d| format!("{d} 12:00:00")).collect();
    let total: Vec<String> = (0..rows).map(|i| ((i * 37) % 2000).to_string()).collect();
    let pct: Vec<String> = (0..rows)
        .map(|i| if i % 9 == 0 { "nan".to_string() } else { format!("{}%", 1 + i % 60) })
        .collect();
    let funds: Vec<String> = (0..rows).map(|i| pick(&FUNDING, i)).collect();

    df![
        "company" => company,
        "location" => location,
        "country" => country,
        "industry" => industry,
        "stage" => stage,
        "date" => date,
        "date_added" => date_added,
        "total_laid_off" => total,
        "percentage_laid_off" => pct,
        "funds_raised" => funds,
    ]
    .unwrap()
}

fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean_layoffs");
    for rows in [1_000, 10_000] {
        let raw = synthetic_raw(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &raw, |b, raw| {
            b.iter(|| clean_layoffs(black_box(raw)).unwrap())
        });
    }
    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let cleaned = clean_layoffs(&synthetic_raw(10_000)).unwrap();
    let engine = MetricsEngine::new(&cleaned);

    c.bench_function("metrics_sequential_10k", |b| b.iter(|| engine.compute_all().unwrap()));
    c.bench_function("metrics_parallel_10k", |b| {
        b.iter(|| engine.compute_all_parallel().unwrap())
    });
}

criterion_group!(benches, bench_clean, bench_metrics);
criterion_main!(benches);
