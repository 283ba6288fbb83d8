//! `coursedex bench`: search latency against the local index.

use crate::output::{print_box_bottom, print_box_rule, print_box_top, print_kv_line, ValueStyle};
use anyhow::{bail, Context};
use clap::Args;
use coursedex_core::Config;
use coursedex_index::{Expr, SearchRequest, Synonyms};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Args, Debug, Clone)]
pub(crate) struct BenchArgs {
    /// File with one query per line (`#` starts a comment)
    #[arg(long)]
    pub(crate) queries: PathBuf,

    /// Passes over the query file
    #[arg(long, default_value = "20")]
    pub(crate) iterations: u32,

    /// Unmeasured passes before timing starts
    #[arg(long, default_value = "2")]
    pub(crate) warmup: u32,

    /// Output format (pretty, json)
    #[arg(short, long, default_value = "pretty")]
    pub(crate) format: String,
}

#[derive(Debug, Serialize)]
struct BenchSummary {
    queries: usize,
    ok_runs: u32,
    error_runs: u32,
    min_us: u64,
    p50_us: u64,
    p90_us: u64,
    p95_us: u64,
    p99_us: u64,
    max_us: u64,
    mean_us: u64,
    total_time_ms: u64,
    qps: f64,
}

pub(crate) fn run(config: &Config, args: BenchArgs) -> anyhow::Result<()> {
    let queries = load_queries(&args.queries)
        .with_context(|| format!("failed to read {}", args.queries.display()))?;
    if queries.is_empty() {
        bail!("No queries found in {}", args.queries.display());
    }

    let snapshot = crate::load_snapshot(config)?;
    let synonyms = Synonyms::new(&config.search.synonyms);
    let engine = snapshot.engine(&synonyms);
    let partner = config.server.default_partner.clone();

    let requests: Vec<Option<SearchRequest>> = queries
        .iter()
        .map(|q| {
            Expr::parse(q)
                .ok()
                .map(|expr| SearchRequest::new(expr).with_partner(partner.clone()))
        })
        .collect();

    let now = chrono::Utc::now();
    for _ in 0..args.warmup {
        for request in requests.iter().flatten() {
            engine.search(request, now);
        }
    }

    let mut samples_us = Vec::with_capacity(requests.len() * args.iterations as usize);
    let mut ok_runs = 0u32;
    let mut error_runs = 0u32;
    let started = Instant::now();
    for _ in 0..args.iterations {
        for request in &requests {
            let Some(request) = request else {
                error_runs += 1;
                continue;
            };
            let t0 = Instant::now();
            let hits = engine.search(request, now);
            let elapsed = t0.elapsed();
            std::hint::black_box(hits.len());
            samples_us.push(elapsed.as_micros().min(u128::from(u64::MAX)) as u64);
            ok_runs += 1;
        }
    }
    let total_time = started.elapsed();

    samples_us.sort_unstable();
    let summary = summarize_latencies(&samples_us, queries.len(), ok_runs, error_runs, total_time);

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print_box_top("coursedex · Search Benchmark");
    print_kv_line("  Queries:", &summary.queries.to_string(), ValueStyle::Neutral);
    print_kv_line("  Runs:", &summary.ok_runs.to_string(), ValueStyle::Neutral);
    if summary.error_runs > 0 {
        print_kv_line(
            "  Unparseable:",
            &summary.error_runs.to_string(),
            ValueStyle::Warn,
        );
    }
    print_box_rule();
    print_kv_line("  p50:", &format_us(summary.p50_us), ValueStyle::Good);
    print_kv_line("  p90:", &format_us(summary.p90_us), ValueStyle::Neutral);
    print_kv_line("  p99:", &format_us(summary.p99_us), ValueStyle::Neutral);
    print_kv_line("  max:", &format_us(summary.max_us), ValueStyle::Neutral);
    print_kv_line("  qps:", &format!("{:.0}", summary.qps), ValueStyle::Good);
    print_box_bottom();
    Ok(())
}

fn load_queries(path: &Path) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn summarize_latencies(
    samples_sorted_us: &[u64],
    queries: usize,
    ok_runs: u32,
    error_runs: u32,
    total_time: Duration,
) -> BenchSummary {
    let n = samples_sorted_us.len();
    let mean_us = if n == 0 {
        0
    } else {
        let sum: u128 = samples_sorted_us.iter().map(|&v| v as u128).sum();
        (sum / n as u128).min(u128::from(u64::MAX)) as u64
    };
    let qps = if total_time.as_secs_f64() > 0.0 {
        ok_runs as f64 / total_time.as_secs_f64()
    } else {
        0.0
    };

    BenchSummary {
        queries,
        ok_runs,
        error_runs,
        min_us: samples_sorted_us.first().copied().unwrap_or(0),
        p50_us: percentile(samples_sorted_us, 50.0),
        p90_us: percentile(samples_sorted_us, 90.0),
        p95_us: percentile(samples_sorted_us, 95.0),
        p99_us: percentile(samples_sorted_us, 99.0),
        max_us: samples_sorted_us.last().copied().unwrap_or(0),
        mean_us,
        total_time_ms: total_time.as_millis().min(u128::from(u64::MAX)) as u64,
        qps,
    }
}

fn percentile(sorted: &[u64], pct: f64) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let clamped = pct.clamp(0.0, 100.0);
    let rank = (clamped / 100.0) * (sorted.len() - 1) as f64;
    sorted[rank.round() as usize]
}

fn format_us(us: u64) -> String {
    if us >= 1_000_000 {
        format!("{:.1}s", us as f64 / 1_000_000.0)
    } else if us >= 1_000 {
        format!("{:.1}ms", us as f64 / 1_000.0)
    } else {
        format!("{us}µs")
    }
}
