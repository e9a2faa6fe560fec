use crate::error::{Error, Result};
use crate::queue::Level;
use crate::scheduler::{Scheduler, Slice};
use crate::task::{Task, Tick};
use log::{debug, info, trace};

/// Round robin over a single FIFO with one quantum.
///
/// Tasks are expected in non-decreasing arrival order. The scheduler never
/// re-sorts: when the head has not arrived yet the clock simply jumps to its
/// arrival time, so out-of-order input produces unspecified relative timing.
pub struct RoundRobinScheduler {
    q: Level,
    now: Tick,
    total: usize,
    processed: usize,
    completed: Vec<Task>,
    trace: Option<Vec<Slice>>,
}

impl RoundRobinScheduler {
    pub fn new(quantum: Tick) -> Result<Self> {
        if quantum == 0 {
            return Err(Error::InvalidConfiguration(
                "round robin quantum must be positive".to_string(),
            ));
        }
        Ok(Self {
            q: Level::new(quantum),
            now: 0,
            total: 0,
            processed: 0,
            completed: Vec::new(),
            trace: None,
        })
    }

    pub fn with_trace(mut self) -> Self {
        self.trace = Some(Vec::new());
        self
    }

    pub fn trace(&self) -> &[Slice] {
        self.trace.as_deref().unwrap_or(&[])
    }
    pub fn quantum(&self) -> Tick {
        self.q.quantum()
    }
    pub fn queue_len(&self) -> usize {
        self.q.len()
    }
    pub fn into_completed(self) -> Vec<Task> {
        self.completed
    }

    /// Runs one slice of the head task. Returns false when all submitted
    /// tasks are done or the queue ran dry.
    pub fn step(&mut self) -> bool {
        if self.processed >= self.total {
            return false;
        }
        let Some(mut task) = self.q.pop() else {
            return false;
        };
        if !task.has_arrived(self.now) {
            debug!(
                "rr: idle at {}, clock jumps to {}",
                self.now,
                task.arrival_time()
            );
            self.now = task.arrival_time();
        }

        let start = self.now;
        let used = task.run_slice(start, self.q.quantum());
        self.now = self.now.saturating_add(used);
        trace!("rr: task {} ran {}..{}", task.id(), start, self.now);
        if let Some(trace) = self.trace.as_mut() {
            trace.push(Slice {
                task_id: task.id(),
                level: 0,
                start,
                end: self.now,
            });
        }

        if task.is_done() {
            task.complete(self.now);
            self.completed.push(task);
            self.processed += 1;
        } else {
            self.q.push(task);
        }
        true
    }
}

impl Scheduler for RoundRobinScheduler {
    fn name(&self) -> &'static str {
        "Round Robin"
    }

    fn add_task(&mut self, task: Task) {
        self.q.push(task);
        self.total += 1;
    }

    fn run(&mut self) {
        info!(
            "rr: running {} tasks with quantum {}",
            self.total,
            self.q.quantum()
        );
        while self.step() {}
        info!("rr: {} tasks finished at tick {}", self.processed, self.now);
    }

    fn completed_tasks(&self) -> &[Task] {
        &self.completed
    }
    fn total_tasks(&self) -> usize {
        self.total
    }
    fn current_time(&self) -> Tick {
        self.now
    }
}
