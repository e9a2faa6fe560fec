//! Result files and comparison tables.
//!
//! Exported CSVs use the column layout below, one row per finished task in
//! completion order. `WaitTime` is recomputed from the timing fields.

use crate::error::{Error, Result};
use crate::metrics::{Comparison, Metrics, WaitStats};
use crate::scheduler::Scheduler;
use crate::task::{Task, TaskState, Tick};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub const CSV_HEADER: &str =
    "TaskID,ArrivalTime,CPURequired,MemoryRequired,Deadline,StartTime,CompletionTime,WaitTime,Status";
const CSV_COLUMNS: usize = 9;

/// Writes `tasks` to `path`, creating parent directories as needed.
pub fn write_csv(path: impl AsRef<Path>, tasks: &[Task]) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "{}", CSV_HEADER)?;
    for task in tasks {
        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{}",
            task.id(),
            task.arrival_time(),
            task.cpu_required(),
            task.memory_required(),
            task.deadline(),
            signed(task.start_time()),
            signed(task.completion_time()),
            signed(task.wait_time()),
            task.state(),
        )?;
    }
    file.flush()?;
    log::info!("wrote {} rows to {}", tasks.len(), path.display());
    Ok(())
}

// unset timing fields are written as -1
fn signed(value: Option<Tick>) -> String {
    value.map_or_else(|| "-1".to_string(), |v| v.to_string())
}

/// Reads a file written by [`write_csv`] back into finished tasks.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<Task>> {
    let mut lines = BufReader::new(File::open(path.as_ref())?).lines();
    match lines.next().transpose()? {
        Some(header) if header.trim() == CSV_HEADER => {}
        Some(_) => return Err(malformed(1, "unexpected header")),
        None => return Err(malformed(1, "missing header")),
    }
    let mut tasks = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line?;
        let lineno = idx + 2;
        if line.trim().is_empty() {
            continue;
        }
        tasks.push(parse_record(&line, lineno)?);
    }
    Ok(tasks)
}

fn parse_record(line: &str, lineno: usize) -> Result<Task> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    if fields.len() != CSV_COLUMNS {
        return Err(malformed(
            lineno,
            &format!("expected {} columns, found {}", CSV_COLUMNS, fields.len()),
        ));
    }
    let num = |i: usize| -> Result<u64> {
        fields[i]
            .parse::<u64>()
            .map_err(|_| malformed(lineno, &format!("bad number {:?}", fields[i])))
    };
    let state = match fields[8] {
        "COMPLETED" => TaskState::Completed,
        "MISSED_DEADLINE" => TaskState::MissedDeadline,
        other => return Err(malformed(lineno, &format!("unknown status {other:?}"))),
    };
    let id = num(0)? as usize;
    let (arrival, completion) = (num(1)?, num(6)?);
    let start = num(5)?;
    if start < arrival || completion < start {
        return Err(malformed(lineno, "timing fields out of order"));
    }
    // WaitTime (column 7) is derived, so it is only checked for shape
    num(7)?;
    Task::finished(id, arrival, num(2)?, num(3)?, num(4)?, start, completion, state).map_err(
        |e| match e {
            Error::InvalidArgument(reason) => malformed(lineno, &reason),
            other => other,
        },
    )
}

fn malformed(line: usize, reason: &str) -> Error {
    Error::MalformedRecord {
        line,
        reason: reason.to_string(),
    }
}

/// Everything reported about one scheduler run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub name: String,
    pub completed: Vec<Task>,
    pub metrics: Metrics,
    pub waits: WaitStats,
}

impl RunSummary {
    /// Feeds each scheduler its own copy of `tasks`, runs it to completion
    /// and summarizes the outcome.
    pub fn simulate(mut scheduler: Box<dyn Scheduler>, tasks: &[Task]) -> Self {
        for task in tasks {
            scheduler.add_task(task.clone());
        }
        scheduler.run();
        Self::from_completed(
            scheduler.name(),
            scheduler.completed_tasks().to_vec(),
            scheduler.total_tasks(),
        )
    }

    pub fn from_completed(name: &str, completed: Vec<Task>, total_submitted: usize) -> Self {
        let metrics = Metrics::compute(&completed, total_submitted);
        let waits = WaitStats::from_tasks(&completed);
        Self {
            name: name.to_string(),
            completed,
            metrics,
            waits,
        }
    }
}

/// Side-by-side aggregates, one column per run.
pub fn metrics_table(runs: &[&RunSummary]) -> String {
    let mut builder = Builder::default();
    let mut header = vec!["Metric".to_string()];
    header.extend(runs.iter().map(|r| r.name.clone()));
    builder.push_record(header);

    let rows: [(&str, fn(&RunSummary) -> String); 10] = [
        ("Submitted Tasks", |r| r.metrics.total_submitted.to_string()),
        ("Completed Tasks", |r| r.metrics.completed.to_string()),
        ("Missed Deadlines", |r| r.metrics.missed_deadlines.to_string()),
        ("Starved Tasks", |r| r.metrics.starved.to_string()),
        ("SLA Compliance", |r| format!("{:.2}%", r.metrics.sla_compliance)),
        ("Avg Wait Time", |r| format!("{:.2}", r.metrics.avg_wait_time)),
        ("Avg Turnaround Time", |r| {
            format!("{:.2}", r.metrics.avg_turnaround_time)
        }),
        ("p50 Wait Time", |r| r.waits.percentile(50.0).to_string()),
        ("p99 Wait Time", |r| r.waits.percentile(99.0).to_string()),
        ("Max Wait Time", |r| r.waits.max().to_string()),
    ];
    for (label, value) in rows {
        let mut record = vec![label.to_string()];
        record.extend(runs.iter().map(|r| value(r)));
        builder.push_record(record);
    }
    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

#[derive(Tabled)]
struct ImprovementRow {
    figure: &'static str,
    value: String,
}

/// The four improvement figures of `comparison`.
pub fn improvement_table(comparison: &Comparison) -> String {
    let rows = vec![
        ImprovementRow {
            figure: "Starvation Reduction",
            value: format!("{:.2}%", comparison.starvation_reduction),
        },
        ImprovementRow {
            figure: "SLA Compliance Improvement",
            value: format!("{:.2}% points", comparison.sla_improvement),
        },
        ImprovementRow {
            figure: "Wait Time Improvement",
            value: format!("{:.2}%", comparison.wait_time_improvement),
        },
        ImprovementRow {
            figure: "Turnaround Time Improvement",
            value: format!("{:.2}%", comparison.turnaround_improvement),
        },
    ];
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

/// Text Gantt chart of the first `limit` finished tasks by start time. Each
/// row spans start..completion scaled onto `width` columns: `#` met its
/// deadline, `x` missed it, `|` marks a deadline inside the window.
pub fn gantt_chart(tasks: &[Task], limit: usize, width: usize) -> String {
    let mut rows: Vec<(&Task, Tick, Tick)> = tasks
        .iter()
        .filter_map(|t| Some((t, t.start_time()?, t.completion_time()?)))
        .collect();
    rows.sort_by_key(|(t, start, _)| (*start, t.id()));
    rows.truncate(limit);

    let width = width.max(1);
    let (Some(origin), Some(end)) = (
        rows.iter().map(|(_, start, _)| *start).min(),
        rows.iter().map(|(_, _, done)| *done).max(),
    ) else {
        return String::new();
    };
    let span = (end - origin).max(1) as u128;
    // column of a tick, in 0..=width
    let scale = |at: Tick| (at.saturating_sub(origin) as u128 * width as u128 / span) as usize;
    let col = |at: Tick| scale(at).min(width - 1);

    let mut out = format!("time {}..{}\n", origin, end);
    for (task, start, done) in rows {
        let mut cells = vec!['.'; width];
        let fill = if task.state() == TaskState::MissedDeadline {
            'x'
        } else {
            '#'
        };
        let first = col(start);
        let last = scale(done).max(first + 1).min(width);
        for cell in &mut cells[first..last] {
            *cell = fill;
        }
        if (origin..=end).contains(&task.deadline()) {
            let mark = &mut cells[col(task.deadline())];
            if *mark == '.' {
                *mark = '|';
            }
        }
        out.push_str(&format!("{:>6} {}\n", task.id(), cells.into_iter().collect::<String>()));
    }
    out
}

/// Horizontal bar chart of SLA compliance, starved tasks and average wait,
/// each figure scaled to its largest value across `runs`.
pub fn metrics_chart(runs: &[&RunSummary], width: usize) -> String {
    let figures: [(&str, fn(&Metrics) -> f64); 3] = [
        ("SLA Compliance (%)", |m| m.sla_compliance),
        ("Starved Tasks", |m| m.starved as f64),
        ("Avg Wait Time", |m| m.avg_wait_time),
    ];
    let label_width = runs.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (title, value) in figures {
        out.push_str(title);
        out.push('\n');
        let peak = runs.iter().map(|r| value(&r.metrics)).fold(0.0, f64::max);
        for run in runs {
            let v = value(&run.metrics);
            let len = if peak > 0.0 {
                (v / peak * width as f64).round() as usize
            } else {
                0
            };
            out.push_str(&format!(
                "  {:<label_width$} {} {:.1}\n",
                run.name,
                "#".repeat(len),
                v
            ));
        }
    }
    out
}
