//! Discrete-event simulation of CPU scheduling policies.
//!
//! A scheduler owns a virtual clock and a set of tasks, hands out
//! non-interruptible slices until every task has finished, and records exact
//! start and completion ticks. [`MlfqScheduler`] and [`RoundRobinScheduler`]
//! share the [`Scheduler`] contract so their outcomes can be compared with
//! [`Metrics`] and [`Comparison`].

mod error;
mod queue;
mod scheduler;
mod task;

pub mod config;
pub mod metrics;
pub mod report;
pub mod tune;
pub mod workload;

pub use error::{Error, Result};
pub use metrics::{Comparison, Metrics, WaitStats};
pub use queue::Level;
pub use scheduler::{MlfqScheduler, RoundRobinScheduler, Scheduler, SchedulerKind, Slice};
pub use task::{Task, TaskId, TaskState, Tick};
