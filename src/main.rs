use clap::{Parser, Subcommand};
use log::{error, info};
use schedsim::config::SimConfig;
use schedsim::report::{self, RunSummary};
use schedsim::tune::{self, TuneGrid};
use schedsim::workload::{self, WorkloadSpec};
use schedsim::{Comparison, SchedulerKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Compare MLFQ and round-robin scheduling on a synthetic workload.
#[derive(Parser)]
#[command(name = "schedsim", version)]
struct Cli {
    #[command(flatten)]
    config: SimConfig,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run both schedulers, export CSVs and print the comparison (default)
    Compare,
    /// Sweep MLFQ boost interval and quanta against the round-robin baseline
    Tune,
    /// Recompute the comparison from previously exported CSVs
    Analyze { mlfq_csv: PathBuf, rr_csv: PathBuf },
    /// Print a text Gantt chart of an exported results CSV
    Gantt {
        csv: PathBuf,
        /// Number of tasks to draw, earliest start first
        #[arg(long, default_value_t = 40)]
        limit: usize,
        /// Chart width in columns
        #[arg(long, default_value_t = 80)]
        width: usize,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let result = match cli.command.unwrap_or(Command::Compare) {
        Command::Compare => compare(&cli.config),
        Command::Tune => run_tune(&cli.config),
        Command::Analyze { mlfq_csv, rr_csv } => analyze(&mlfq_csv, &rr_csv),
        Command::Gantt { csv, limit, width } => gantt(&csv, limit, width),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn compare(config: &SimConfig) -> schedsim::Result<()> {
    let tasks = workload::generate(&WorkloadSpec::default(), config.tasks, config.seed)?;
    info!("generated {} tasks (seed {})", tasks.len(), config.seed);

    let mlfq = RunSummary::simulate(config.build(SchedulerKind::Mlfq)?, &tasks);
    report::write_csv(config.mlfq_csv(), &mlfq.completed)?;
    let rr = RunSummary::simulate(config.build(SchedulerKind::RoundRobin)?, &tasks);
    report::write_csv(config.rr_csv(), &rr.completed)?;

    print_comparison(&mlfq, &rr);
    Ok(())
}

fn run_tune(config: &SimConfig) -> schedsim::Result<()> {
    let tasks = workload::generate(&WorkloadSpec::default(), config.tasks, config.seed)?;
    let outcome = tune::sweep(&tasks, &TuneGrid::default(), config.rr_quantum)?;

    let mut ranked: Vec<_> = outcome.points.iter().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    println!("\nMLFQ parameter sweep (vs Round Robin, quantum {}):", config.rr_quantum);
    println!(
        "{:<8} {:<14} {:>12} {:>12} {:>10}",
        "boost", "quanta", "starv. red.", "sla (pts)", "score"
    );
    println!("{}", "-".repeat(60));
    for point in ranked {
        println!(
            "{:<8} {:<14} {:>11.2}% {:>12.2} {:>10.2}",
            point.boost_interval,
            format!("{:?}", point.quanta),
            point.comparison.starvation_reduction,
            point.comparison.sla_improvement,
            point.score,
        );
    }
    if let Some(best) = outcome.best_point() {
        println!(
            "\nBest parameters: boost_interval={}, quanta={:?}",
            best.boost_interval, best.quanta
        );
    }
    Ok(())
}

fn analyze(mlfq_csv: &Path, rr_csv: &Path) -> schedsim::Result<()> {
    let mlfq_tasks = report::read_csv(mlfq_csv)?;
    let rr_tasks = report::read_csv(rr_csv)?;
    let total = mlfq_tasks.len();
    let mlfq = RunSummary::from_completed("MLFQ", mlfq_tasks, total);
    let total = rr_tasks.len();
    let rr = RunSummary::from_completed("Round Robin", rr_tasks, total);
    print_comparison(&mlfq, &rr);
    Ok(())
}

fn gantt(csv: &Path, limit: usize, width: usize) -> schedsim::Result<()> {
    let tasks = report::read_csv(csv)?;
    println!("Gantt chart of {} (# met, x missed, | deadline):", csv.display());
    print!("{}", report::gantt_chart(&tasks, limit, width));
    Ok(())
}

fn print_comparison(mlfq: &RunSummary, rr: &RunSummary) {
    let comparison = Comparison::between(&mlfq.metrics, &rr.metrics);
    println!("\nPerformance comparison (MLFQ vs Round Robin):");
    println!("{}", report::metrics_table(&[mlfq, rr]));
    println!("\nImprovement with MLFQ:");
    println!("{}", report::improvement_table(&comparison));
    println!("\n{}", report::metrics_chart(&[mlfq, rr], 40));
}
