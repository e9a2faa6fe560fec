use crate::task::{Task, Tick};
use std::collections::VecDeque;

/// One FIFO of owned tasks together with the slice length granted to
/// whatever is dispatched from it.
#[derive(Debug, Clone)]
pub struct Level {
    quantum: Tick,
    q: VecDeque<Task>,
}

impl Level {
    pub fn new(quantum: Tick) -> Self {
        Self {
            quantum,
            q: VecDeque::new(),
        }
    }
    pub fn quantum(&self) -> Tick {
        self.quantum
    }

    #[inline]
    pub fn push(&mut self, task: Task) {
        self.q.push_back(task);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Task> {
        self.q.pop_front()
    }

    /// Only the head is ever considered for dispatch; tasks behind it wait
    /// their turn even if they arrived earlier.
    #[inline]
    pub fn head(&self) -> Option<&Task> {
        self.q.front()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }
    pub fn len(&self) -> usize {
        self.q.len()
    }

    /// Moves every task of `other` to the back of this level, keeping order.
    pub fn append(&mut self, other: &mut Level) {
        self.q.append(&mut other.q);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.q.iter()
    }
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Task> {
        self.q.iter_mut()
    }
}
