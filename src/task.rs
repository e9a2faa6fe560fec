use crate::error::{Error, Result};
use std::cmp::Ordering;

/// Simulated clock value.
pub type Tick = u64;
pub type TaskId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Completed,
    MissedDeadline,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Pending => "PENDING",
            TaskState::Completed => "COMPLETED",
            TaskState::MissedDeadline => "MISSED_DEADLINE",
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        !matches!(self, TaskState::Pending)
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of simulated work and its timing record.
///
/// The identity fields are fixed at construction. The timing fields are
/// only written by the scheduler that owns the task, so every scheduler must
/// be handed its own clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    arrival_time: Tick,
    cpu_required: Tick,
    // carried for export, never consulted by a policy
    memory_required: u64,
    deadline: Tick,

    state: TaskState,
    remaining_time: Tick,
    // set on the first slice, never rewritten
    start_time: Option<Tick>,
    // set when remaining_time reaches 0
    completion_time: Option<Tick>,
    // MLFQ level currently holding the task
    current_queue: usize,
}

impl Task {
    pub fn new(
        id: TaskId,
        arrival_time: Tick,
        cpu_required: Tick,
        memory_required: u64,
        deadline: Tick,
    ) -> Result<Self> {
        if cpu_required == 0 {
            return Err(Error::InvalidArgument(format!(
                "task {id}: cpu_required must be positive"
            )));
        }
        if deadline <= arrival_time {
            return Err(Error::InvalidArgument(format!(
                "task {id}: deadline {deadline} must be after arrival {arrival_time}"
            )));
        }
        if arrival_time.checked_add(cpu_required).is_none() {
            return Err(Error::InvalidArgument(format!(
                "task {id}: arrival {arrival_time} + cpu {cpu_required} overflows the clock"
            )));
        }
        Ok(Self {
            id,
            arrival_time,
            cpu_required,
            memory_required,
            deadline,
            state: TaskState::Pending,
            remaining_time: cpu_required,
            start_time: None,
            completion_time: None,
            current_queue: 0,
        })
    }

    /// Rebuilds a task that already ran to completion, e.g. from an exported
    /// results file.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn finished(
        id: TaskId,
        arrival_time: Tick,
        cpu_required: Tick,
        memory_required: u64,
        deadline: Tick,
        start_time: Tick,
        completion_time: Tick,
        state: TaskState,
    ) -> Result<Self> {
        let mut task = Self::new(id, arrival_time, cpu_required, memory_required, deadline)?;
        task.remaining_time = 0;
        task.start_time = Some(start_time);
        task.completion_time = Some(completion_time);
        task.state = state;
        Ok(task)
    }

    /// Orders tasks by deadline, then id.
    pub fn deadline_order(a: &Task, b: &Task) -> Ordering {
        a.deadline.cmp(&b.deadline).then(a.id.cmp(&b.id))
    }

    pub fn id(&self) -> TaskId {
        self.id
    }
    pub fn arrival_time(&self) -> Tick {
        self.arrival_time
    }
    pub fn cpu_required(&self) -> Tick {
        self.cpu_required
    }
    pub fn memory_required(&self) -> u64 {
        self.memory_required
    }
    pub fn deadline(&self) -> Tick {
        self.deadline
    }
    pub fn state(&self) -> TaskState {
        self.state
    }
    pub fn remaining_time(&self) -> Tick {
        self.remaining_time
    }
    pub fn start_time(&self) -> Option<Tick> {
        self.start_time
    }
    pub fn completion_time(&self) -> Option<Tick> {
        self.completion_time
    }
    pub fn current_queue(&self) -> usize {
        self.current_queue
    }

    #[inline]
    pub fn has_arrived(&self, now: Tick) -> bool {
        self.arrival_time <= now
    }

    /// `completion_time - arrival_time`, once finished.
    pub fn turnaround_time(&self) -> Option<Tick> {
        self.completion_time
            .map(|done| done.saturating_sub(self.arrival_time))
    }

    /// Turnaround minus the CPU the task needed, floored at zero. Always
    /// derived from the timing fields rather than tracked while running.
    pub fn wait_time(&self) -> Option<Tick> {
        self.turnaround_time()
            .map(|turnaround| turnaround.saturating_sub(self.cpu_required))
    }

    #[inline]
    pub(crate) fn set_queue(&mut self, level: usize) {
        self.current_queue = level;
    }

    /// Runs the task for at most `quantum` ticks starting at `now` and
    /// returns the ticks actually consumed.
    pub(crate) fn run_slice(&mut self, now: Tick, quantum: Tick) -> Tick {
        debug_assert!(!self.state.is_finished(), "finished task dispatched");
        if self.start_time.is_none() {
            self.start_time = Some(now);
        }
        let used = quantum.min(self.remaining_time);
        self.remaining_time -= used;
        used
    }

    /// Marks the task finished at `now` and classifies it against its deadline.
    pub(crate) fn complete(&mut self, now: Tick) {
        debug_assert_eq!(self.remaining_time, 0);
        self.completion_time = Some(now);
        self.state = if now > self.deadline {
            TaskState::MissedDeadline
        } else {
            TaskState::Completed
        };
    }

    #[inline]
    pub(crate) fn is_done(&self) -> bool {
        self.remaining_time == 0
    }
}
