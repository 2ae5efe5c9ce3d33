//! Execution timeline (Gantt chart).
//!
//! An insertion-ordered list of `(task, start, end)` slices produced as the
//! engine dispatches work. A task may appear many times under the
//! preemptive and periodic policies; slices never overlap.

use serde::{Deserialize, Serialize};

use super::Time;

/// The Gantt chart of one policy run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    /// Slices in dispatch order.
    pub slices: Vec<Slice>,
}

/// One dispatch of a task on the CPU during `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    /// Dispatched task ID.
    pub task_id: String,
    /// Start time.
    pub start: Time,
    /// End time.
    pub end: Time,
}

impl Slice {
    /// Creates a slice.
    pub fn new(task_id: impl Into<String>, start: Time, end: Time) -> Self {
        Self {
            task_id: task_id.into(),
            start,
            end,
        }
    }

    /// Slice length.
    #[inline]
    pub fn duration(&self) -> Time {
        self.end - self.start
    }
}

impl Timeline {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a slice.
    pub fn push(&mut self, slice: Slice) {
        self.slices.push(slice);
    }

    /// Latest end time across all slices.
    pub fn makespan(&self) -> Time {
        self.slices.iter().map(|s| s.end).max().unwrap_or(0)
    }

    /// Total CPU busy time.
    pub fn busy_time(&self) -> Time {
        self.slices.iter().map(Slice::duration).sum()
    }

    /// Time between slices during which the CPU sat idle, up to the makespan.
    pub fn idle_time(&self) -> Time {
        self.makespan() - self.busy_time()
    }

    /// All slices of a given task.
    pub fn slices_for_task(&self, task_id: &str) -> Vec<&Slice> {
        self.slices
            .iter()
            .filter(|s| s.task_id == task_id)
            .collect()
    }

    /// Whether any two slices overlap.
    pub fn has_overlap(&self) -> bool {
        let mut sorted: Vec<&Slice> = self.slices.iter().collect();
        sorted.sort_by_key(|s| s.start);
        sorted.windows(2).any(|w| w[1].start < w[0].end)
    }

    /// Number of slices.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Whether the timeline is empty.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// `(task_id, start, end)` triples, as handed to chart renderers.
    pub fn triples(&self) -> Vec<(&str, Time, Time)> {
        self.slices
            .iter()
            .map(|s| (s.task_id.as_str(), s.start, s.end))
            .collect()
    }
}
