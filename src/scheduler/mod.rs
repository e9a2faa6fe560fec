mod mlfq;
mod round_robin;
pub use mlfq::MlfqScheduler;
pub use round_robin::RoundRobinScheduler;

use crate::task::{Task, TaskId, Tick};

/// A simulated CPU scheduling policy.
///
/// Implementations own their tasks outright: `add_task` takes the task by
/// value and `run` drives a private virtual clock until every submitted task
/// has finished.
pub trait Scheduler {
    fn name(&self) -> &'static str;
    fn add_task(&mut self, task: Task);
    fn run(&mut self);
    /// Finished tasks in the order they completed.
    fn completed_tasks(&self) -> &[Task];
    /// Number of tasks accepted by `add_task`.
    fn total_tasks(&self) -> usize;
    fn current_time(&self) -> Tick;
}

/// One contiguous run of a task on the simulated CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub task_id: TaskId,
    pub level: usize,
    pub start: Tick,
    pub end: Tick,
}

impl Slice {
    pub fn ticks(&self) -> Tick {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerKind {
    Mlfq,
    RoundRobin,
}

impl std::fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerKind::Mlfq => write!(f, "MLFQ"),
            SchedulerKind::RoundRobin => write!(f, "Round Robin"),
        }
    }
}
