//! Released instances (jobs) of periodic tasks.

use serde::{Deserialize, Serialize};

use super::{Task, Time};

/// One released occurrence of a periodic [`Task`].
///
/// Instance `k` of a task is released at `arrival + k * period`. Shared
/// attributes (identity, burst, period) are read through the owning task,
/// referenced by its position in the run's task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInstance {
    /// Index of the owning task in the run's task list.
    pub task_index: usize,
    /// Owning task ID (denormalized for query convenience).
    pub task_id: String,
    /// Release sequence number `k` within the owning task.
    pub job: u32,
    /// Release time.
    pub release: Time,
    /// Absolute deadline. `None` = unbounded (no miss detection).
    pub absolute_deadline: Option<Time>,
    /// CPU time still needed by this instance.
    pub remaining: Time,
    /// Completion time, once finished.
    pub completion_time: Option<Time>,
}

impl TaskInstance {
    /// Releases instance `job` of `task` at `release`.
    ///
    /// An absolute deadline past `Time::MAX` saturates; no completion can
    /// reach it, so it is never missed.
    pub fn release(task_index: usize, task: &Task, job: u32, release: Time) -> Self {
        Self {
            task_index,
            task_id: task.id.clone(),
            job,
            release,
            absolute_deadline: task.deadline.map(|d| release.saturating_add(d)),
            remaining: task.burst,
            completion_time: None,
        }
    }

    /// Whether the instance still needs CPU time.
    pub fn is_ready(&self) -> bool {
        self.remaining > 0
    }

    /// Whether the instance completed after its absolute deadline.
    pub fn missed_deadline(&self) -> bool {
        match (self.completion_time, self.absolute_deadline) {
            (Some(done), Some(deadline)) => done > deadline,
            _ => false,
        }
    }

    /// Response time: completion − release. `None` until complete.
    pub fn response_time(&self) -> Option<Time> {
        self.completion_time.map(|done| done - self.release)
    }
}
