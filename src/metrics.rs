use crate::task::{Task, TaskState, Tick};

/// A task counts as starved once it waited more than this many times its
/// own CPU requirement.
pub const STARVATION_FACTOR: Tick = 3;

/// Aggregate outcome of one scheduler run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub total_submitted: usize,
    pub completed: usize,
    pub missed_deadlines: usize,
    pub starved: usize,
    /// Mean wait over every finished task, met or missed.
    pub avg_wait_time: f64,
    /// Mean turnaround over tasks that met their deadline only.
    pub avg_turnaround_time: f64,
    /// `completed / total_submitted`, in percent.
    pub sla_compliance: f64,
}

impl Metrics {
    /// Computes the aggregate over `tasks`, using `total_submitted` as the
    /// SLA denominator. Wait and turnaround are recomputed from each task's
    /// timing fields. Unfinished tasks are skipped.
    pub fn compute(tasks: &[Task], total_submitted: usize) -> Self {
        let mut m = Metrics {
            total_submitted,
            ..Default::default()
        };
        let mut total_wait: u128 = 0;
        let mut total_turnaround: u128 = 0;
        let mut finished = 0usize;

        for task in tasks {
            let (Some(turnaround), Some(wait)) = (task.turnaround_time(), task.wait_time()) else {
                continue;
            };
            finished += 1;
            match task.state() {
                TaskState::Completed => {
                    m.completed += 1;
                    total_turnaround += turnaround as u128;
                }
                TaskState::MissedDeadline => m.missed_deadlines += 1,
                TaskState::Pending => {}
            }
            total_wait += wait as u128;
            // a threshold past Tick::MAX can never be exceeded
            let starved = task
                .cpu_required()
                .checked_mul(STARVATION_FACTOR)
                .is_some_and(|limit| wait > limit);
            if starved {
                m.starved += 1;
            }
        }

        m.avg_wait_time = ratio(total_wait as f64, finished as f64);
        m.avg_turnaround_time = ratio(total_turnaround as f64, m.completed as f64);
        m.sla_compliance = ratio(m.completed as f64 * 100.0, total_submitted as f64);
        m
    }

    /// Like [`Metrics::compute`] with every task in `tasks` counted as
    /// submitted.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self::compute(tasks, tasks.len())
    }
}

#[inline]
fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Distribution of wait times of one run.
#[derive(Debug, Clone)]
pub struct WaitStats {
    // sorted ascending
    samples: Vec<Tick>,
}

impl WaitStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut samples: Vec<Tick> = tasks.iter().filter_map(Task::wait_time).collect();
        samples.sort_unstable();
        Self { samples }
    }

    /// Nearest-rank percentile, `p` in `[0, 100]`.
    pub fn percentile(&self, p: f64) -> Tick {
        if self.samples.is_empty() {
            return 0;
        }
        let idx = ((p / 100.0) * (self.samples.len() - 1) as f64).round() as usize;
        self.samples[idx.min(self.samples.len() - 1)]
    }

    pub fn mean(&self) -> f64 {
        let sum: u128 = self.samples.iter().map(|s| *s as u128).sum();
        ratio(sum as f64, self.samples.len() as f64)
    }

    pub fn max(&self) -> Tick {
        self.samples.last().copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// How a candidate run fares against a baseline run. Positive values mean
/// the candidate is better.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Comparison {
    /// Percent fewer starved tasks.
    pub starvation_reduction: f64,
    /// Difference in SLA compliance, in percentage points.
    pub sla_improvement: f64,
    /// Percent lower average wait.
    pub wait_time_improvement: f64,
    /// Percent lower average turnaround.
    pub turnaround_improvement: f64,
}

impl Comparison {
    pub fn between(candidate: &Metrics, baseline: &Metrics) -> Self {
        Self {
            starvation_reduction: reduction(candidate.starved as f64, baseline.starved as f64),
            sla_improvement: candidate.sla_compliance - baseline.sla_compliance,
            wait_time_improvement: reduction(candidate.avg_wait_time, baseline.avg_wait_time),
            turnaround_improvement: reduction(
                candidate.avg_turnaround_time,
                baseline.avg_turnaround_time,
            ),
        }
    }
}

// (1 - candidate / baseline) * 100, or 0 for a zero baseline
fn reduction(candidate: f64, baseline: f64) -> f64 {
    if baseline > 0.0 {
        (1.0 - candidate / baseline) * 100.0
    } else {
        0.0
    }
}
