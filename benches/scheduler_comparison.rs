//! Scheduler Comparison Benchmark
//!
//! Run with: cargo bench --bench scheduler_comparison
//!
//! Measures how long each policy takes to simulate a synthetic workload to
//! completion, and reports the outcome metrics next to the timings so
//! regressions in either speed or scheduling behavior show up together.
//!
//! Setup:
//! - Same seeded workload for every scheduler
//! - Workload sizes from 1k to 50k tasks
//! - Each (scheduler, size) pair is run BENCH_ITERS times on fresh copies

use schedsim::config::SimConfig;
use schedsim::report::RunSummary;
use schedsim::workload::{generate, WorkloadSpec};
use schedsim::{SchedulerKind, Task};
use std::fs::File;
use std::io::Write;
use std::time::{Duration, Instant};
use tabled::settings::Style;
use tabled::{Table, Tabled};

// ============================================================================
// Configuration
// ============================================================================

const SIZES: [usize; 4] = [1_000, 5_000, 10_000, 50_000];
const SEED: u64 = 42;
const BENCH_ITERS: usize = 5;

// ============================================================================
// Runner
// ============================================================================

struct BenchmarkResult {
    scheduler: SchedulerKind,
    tasks: usize,
    iteration: usize,
    elapsed: Duration,
    summary: RunSummary,
}

fn run_once(config: &SimConfig, kind: SchedulerKind, tasks: &[Task]) -> (Duration, RunSummary) {
    let scheduler = config
        .build(kind)
        .expect("default scheduler config is valid");
    let start = Instant::now();
    let summary = RunSummary::simulate(scheduler, tasks);
    (start.elapsed(), summary)
}

// ============================================================================
// Output
// ============================================================================

fn write_csv(results: &[BenchmarkResult], filename: &str) -> std::io::Result<()> {
    let mut file = File::create(filename)?;
    writeln!(
        file,
        "scheduler,tasks,iteration,elapsed_ns,completed,missed,starved,sla_compliance,avg_wait,avg_turnaround"
    )?;
    for r in results {
        let m = &r.summary.metrics;
        writeln!(
            file,
            "{},{},{},{},{},{},{},{:.4},{:.4},{:.4}",
            r.scheduler,
            r.tasks,
            r.iteration,
            r.elapsed.as_nanos(),
            m.completed,
            m.missed_deadlines,
            m.starved,
            m.sla_compliance,
            m.avg_wait_time,
            m.avg_turnaround_time,
        )?;
    }
    Ok(())
}

#[derive(Tabled)]
struct SummaryRow {
    scheduler: String,
    tasks: usize,
    mean_ms: String,
    min_ms: String,
    tasks_per_ms: String,
    sla: String,
    starved: usize,
    avg_wait: String,
}

fn summarize(results: &[BenchmarkResult]) -> Vec<SummaryRow> {
    let mut rows = Vec::new();
    for kind in [SchedulerKind::Mlfq, SchedulerKind::RoundRobin] {
        for size in SIZES {
            let runs: Vec<_> = results
                .iter()
                .filter(|r| r.scheduler == kind && r.tasks == size)
                .collect();
            let Some(first) = runs.first() else {
                continue;
            };
            let total: Duration = runs.iter().map(|r| r.elapsed).sum();
            let mean = total / runs.len() as u32;
            let min = runs.iter().map(|r| r.elapsed).min().unwrap_or_default();
            let m = &first.summary.metrics;
            rows.push(SummaryRow {
                scheduler: kind.to_string(),
                tasks: size,
                mean_ms: format!("{:.3}", mean.as_secs_f64() * 1000.0),
                min_ms: format!("{:.3}", min.as_secs_f64() * 1000.0),
                tasks_per_ms: format!("{:.1}", size as f64 / (mean.as_secs_f64() * 1000.0)),
                sla: format!("{:.2}%", m.sla_compliance),
                starved: m.starved,
                avg_wait: format!("{:.2}", m.avg_wait_time),
            });
        }
    }
    rows
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    println!("Scheduler Comparison Benchmark");
    println!("==============================");
    println!("Sizes:      {:?}", SIZES);
    println!("Seed:       {}", SEED);
    println!("Iterations: {}", BENCH_ITERS);
    println!();

    let config = SimConfig::default();
    let mut results = Vec::new();

    for size in SIZES {
        let tasks = generate(&WorkloadSpec::default(), size, SEED).expect("workload generation");
        for kind in [SchedulerKind::Mlfq, SchedulerKind::RoundRobin] {
            print!("  {} x {}...", kind, size);
            std::io::stdout().flush().unwrap();
            for i in 0..BENCH_ITERS {
                let (elapsed, summary) = run_once(&config, kind, &tasks);
                results.push(BenchmarkResult {
                    scheduler: kind,
                    tasks: size,
                    iteration: i,
                    elapsed,
                    summary,
                });
            }
            println!(" done");
        }
    }

    // every iteration sees the same input, so outcomes must not drift
    for r in &results {
        let first = results
            .iter()
            .find(|o| o.scheduler == r.scheduler && o.tasks == r.tasks)
            .unwrap();
        assert_eq!(
            first.summary.metrics, r.summary.metrics,
            "{} produced different metrics across iterations",
            r.scheduler
        );
    }

    let mut table = Table::new(summarize(&results));
    table.with(Style::modern());
    println!("\n{}", table);

    println!("\nWriting results to scheduler_comparison_results.csv...");
    if let Err(e) = write_csv(&results, "scheduler_comparison_results.csv") {
        eprintln!("Failed to write CSV: {}", e);
    } else {
        println!("Done!");
    }
}
