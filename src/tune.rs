use crate::error::Result;
use crate::metrics::Comparison;
use crate::report::RunSummary;
use crate::scheduler::{MlfqScheduler, RoundRobinScheduler};
use crate::task::{Task, Tick};
use log::{debug, info};

/// Candidate MLFQ settings. Every point uses three levels with quanta
/// `[q1, q2, 2 * q2]`.
#[derive(Debug, Clone)]
pub struct TuneGrid {
    pub boost_intervals: Vec<Tick>,
    pub first_quanta: Vec<Tick>,
    pub second_quanta: Vec<Tick>,
}

impl Default for TuneGrid {
    fn default() -> Self {
        Self {
            boost_intervals: vec![30, 50, 70, 100],
            first_quanta: vec![5, 10, 15],
            second_quanta: vec![10, 20, 30],
        }
    }
}

impl TuneGrid {
    fn points(&self) -> impl Iterator<Item = (Tick, [Tick; 3])> + '_ {
        self.boost_intervals.iter().flat_map(move |boost| {
            self.first_quanta.iter().flat_map(move |q1| {
                self.second_quanta
                    .iter()
                    .map(move |q2| (*boost, [*q1, *q2, *q2 * 2]))
            })
        })
    }
}

#[derive(Debug, Clone)]
pub struct TunePoint {
    pub boost_interval: Tick,
    pub quanta: [Tick; 3],
    pub comparison: Comparison,
    /// Starvation reduction plus relative SLA gain over the baseline.
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct TuneOutcome {
    pub baseline: RunSummary,
    /// Points in grid order.
    pub points: Vec<TunePoint>,
    /// Index into `points` of the best score; the first wins ties.
    pub best: Option<usize>,
}

impl TuneOutcome {
    pub fn best_point(&self) -> Option<&TunePoint> {
        self.best.map(|idx| &self.points[idx])
    }
}

/// Runs round robin once as the baseline, then MLFQ at every grid point on
/// fresh copies of `tasks`.
pub fn sweep(tasks: &[Task], grid: &TuneGrid, rr_quantum: Tick) -> Result<TuneOutcome> {
    let baseline = RunSummary::simulate(Box::new(RoundRobinScheduler::new(rr_quantum)?), tasks);
    info!(
        "tune: baseline rr(q={}) sla {:.2}%, {} starved",
        rr_quantum, baseline.metrics.sla_compliance, baseline.metrics.starved
    );

    let mut points: Vec<TunePoint> = Vec::new();
    let mut best: Option<usize> = None;
    for (boost, quanta) in grid.points() {
        let scheduler = MlfqScheduler::new(quanta.len(), &quanta, boost)?;
        let run = RunSummary::simulate(Box::new(scheduler), tasks);
        let comparison = Comparison::between(&run.metrics, &baseline.metrics);
        let score = comparison.starvation_reduction
            + relative_gain(run.metrics.sla_compliance, baseline.metrics.sla_compliance);
        debug!(
            "tune: boost={} quanta={:?} score={:.2}",
            boost, quanta, score
        );

        if best.map_or(true, |idx| score > points[idx].score) {
            best = Some(points.len());
        }
        points.push(TunePoint {
            boost_interval: boost,
            quanta,
            comparison,
            score,
        });
    }

    if let Some(point) = best.map(|idx| &points[idx]) {
        info!(
            "tune: best boost={} quanta={:?} score={:.2}",
            point.boost_interval, point.quanta, point.score
        );
    }
    Ok(TuneOutcome {
        baseline,
        points,
        best,
    })
}

// (candidate - baseline) / baseline * 100, or 0 for a zero baseline
fn relative_gain(candidate: f64, baseline: f64) -> f64 {
    if baseline > 0.0 {
        (candidate - baseline) / baseline * 100.0
    } else {
        0.0
    }
}
