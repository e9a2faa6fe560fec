use crate::error::{Error, Result};
use crate::queue::Level;
use crate::scheduler::{Scheduler, Slice};
use crate::task::{Task, Tick};
use log::{debug, info, trace};

/// Multi-level feedback queue.
///
/// Tasks enter at level 0 and drop one level every time they use up a full
/// slice without finishing. Level `i` grants slices of `quanta[i]` ticks. Every
/// `boost_interval` ticks all tasks are moved back to level 0 so long jobs
/// sitting at the bottom still make progress.
///
/// Execution is slice-atomic: once dispatched, a task keeps the CPU for its
/// whole slice even if something arrives in a higher level meanwhile.
pub struct MlfqScheduler {
    // levels[0] has the highest priority
    levels: Vec<Level>,
    // 0 disables boosting
    boost_interval: Tick,

    now: Tick,
    // tasks accepted by add_task vs tasks finished
    total: usize,
    processed: usize,
    completed: Vec<Task>,

    boosts: u64,
    trace: Option<Vec<Slice>>,
}

enum Pick {
    Ready(usize),
    // earliest arrival seen at the head of any level, if any
    Idle(Option<Tick>),
}

impl MlfqScheduler {
    pub fn new(num_queues: usize, quanta: &[Tick], boost_interval: Tick) -> Result<Self> {
        if quanta.len() != num_queues {
            return Err(Error::InvalidConfiguration(format!(
                "{} time quanta given for {} queues",
                quanta.len(),
                num_queues
            )));
        }
        if let Some(level) = quanta.iter().position(|q| *q == 0) {
            return Err(Error::InvalidConfiguration(format!(
                "quantum of level {level} must be positive"
            )));
        }
        Ok(Self {
            levels: quanta.iter().map(|q| Level::new(*q)).collect(),
            boost_interval,
            now: 0,
            total: 0,
            processed: 0,
            completed: Vec::new(),
            boosts: 0,
            trace: None,
        })
    }

    /// Records every slice handed out; see [`MlfqScheduler::trace`].
    pub fn with_trace(mut self) -> Self {
        self.trace = Some(Vec::new());
        self
    }

    pub fn trace(&self) -> &[Slice] {
        self.trace.as_deref().unwrap_or(&[])
    }
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }
    pub fn queue_len(&self, level: usize) -> usize {
        self.levels.get(level).map_or(0, Level::len)
    }
    pub fn boost_interval(&self) -> Tick {
        self.boost_interval
    }
    /// Number of boost events fired so far.
    pub fn boosts(&self) -> u64 {
        self.boosts
    }
    pub fn into_completed(self) -> Vec<Task> {
        self.completed
    }

    /// Advances the simulation by one iteration: boost check, then either one
    /// slice or one idle clock jump. Returns false once every submitted task
    /// has finished.
    pub fn step(&mut self) -> bool {
        if self.processed >= self.total {
            return false;
        }
        self.maybe_boost();
        match self.pick() {
            Pick::Ready(level) => self.dispatch(level),
            Pick::Idle(earliest) => {
                let next = match earliest {
                    Some(at) if at > self.now => at,
                    // nothing known to arrive later; creep forward
                    _ => self.now.saturating_add(1),
                };
                debug!("mlfq: idle at {}, clock jumps to {}", self.now, next);
                self.now = next;
            }
        }
        true
    }

    fn maybe_boost(&mut self) {
        if self.boost_interval == 0 || self.now == 0 || self.now % self.boost_interval != 0 {
            return;
        }
        self.boosts += 1;
        let Some((top, rest)) = self.levels.split_first_mut() else {
            return;
        };
        let mut moved = 0;
        for level in rest.iter_mut() {
            moved += level.len();
            for task in level.iter_mut() {
                task.set_queue(0);
            }
            top.append(level);
        }
        debug!("mlfq: boost at {} moved {} tasks to level 0", self.now, moved);
    }

    /// Scans levels from the top and returns the first whose head has
    /// arrived. Lower levels are still checked when a higher head is in the
    /// future.
    fn pick(&self) -> Pick {
        let mut earliest: Option<Tick> = None;
        for (idx, level) in self.levels.iter().enumerate() {
            let Some(head) = level.head() else {
                continue;
            };
            if head.has_arrived(self.now) {
                return Pick::Ready(idx);
            }
            let at = head.arrival_time();
            earliest = Some(earliest.map_or(at, |e| e.min(at)));
        }
        Pick::Idle(earliest)
    }

    fn dispatch(&mut self, idx: usize) {
        let level = &mut self.levels[idx];
        let quantum = level.quantum();
        let Some(mut task) = level.pop() else {
            return;
        };
        let start = self.now;
        let used = task.run_slice(start, quantum);
        self.now = self.now.saturating_add(used);
        trace!(
            "mlfq: task {} ran {}..{} at level {}",
            task.id(),
            start,
            self.now,
            idx
        );
        if let Some(trace) = self.trace.as_mut() {
            trace.push(Slice {
                task_id: task.id(),
                level: idx,
                start,
                end: self.now,
            });
        }

        if task.is_done() {
            task.complete(self.now);
            self.completed.push(task);
            self.processed += 1;
        } else {
            let next = (idx + 1).min(self.levels.len() - 1);
            task.set_queue(next);
            self.levels[next].push(task);
        }
    }
}

impl Scheduler for MlfqScheduler {
    fn name(&self) -> &'static str {
        "MLFQ"
    }

    /// Queues the task at level 0. Ignored when there are no levels.
    fn add_task(&mut self, mut task: Task) {
        let Some(top) = self.levels.first_mut() else {
            return;
        };
        task.set_queue(0);
        top.push(task);
        self.total += 1;
    }

    fn run(&mut self) {
        info!(
            "mlfq: running {} tasks over {} levels (boost every {})",
            self.total,
            self.levels.len(),
            self.boost_interval
        );
        while self.step() {}
        info!(
            "mlfq: {} tasks finished at tick {} after {} boosts",
            self.processed, self.now, self.boosts
        );
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
