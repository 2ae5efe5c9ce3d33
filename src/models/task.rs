//! Task (process/job) model.
//!
//! A task is one schedulable unit of CPU work. The scheduling engine
//! mutates a private copy of each task while it runs: remaining time is
//! decremented, the first dispatch fixes the start time, and every dispatch
//! is recorded as an [`Execution`] interval.
//!
//! # Time Representation
//! All times are integer simulated-time units relative to t=0.

use serde::{Deserialize, Serialize};

/// Simulated time, in abstract integer units.
pub type Time = i64;

/// A task to be scheduled.
///
/// Static attributes (`arrival`, `burst`, `deadline`, `period`) come from
/// the caller. Run-state attributes (`remaining`, `start_time`,
/// `finish_time`, `executions`) are owned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Time at which the task becomes known to the scheduler.
    pub arrival: Time,
    /// CPU time required to complete (per instance, for periodic tasks).
    pub burst: Time,
    /// Relative deadline. `None` = no deadline.
    pub deadline: Option<Time>,
    /// Release period. Required by the periodic policies.
    pub period: Option<Time>,
    /// CPU time still needed. Always within `[0, burst]`.
    pub remaining: Time,
    /// First dispatch time. Set once.
    pub start_time: Option<Time>,
    /// Completion time. Set once, when `remaining` reaches 0.
    pub finish_time: Option<Time>,
    /// Every dispatch of this task, ordered by start.
    pub executions: Vec<Execution>,
}

/// One contiguous execution interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    /// Dispatch time.
    pub start: Time,
    /// Preemption or completion time.
    pub end: Time,
}

impl Execution {
    /// Creates an interval.
    pub fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    /// Length of the interval.
    #[inline]
    pub fn duration(&self) -> Time {
        self.end - self.start
    }
}

impl Task {
    /// Creates a task arriving at `arrival` that needs `burst` units of CPU.
    pub fn new(id: impl Into<String>, arrival: Time, burst: Time) -> Self {
        Self {
            id: id.into(),
            arrival,
            burst,
            deadline: None,
            period: None,
            remaining: burst,
            start_time: None,
            finish_time: None,
            executions: Vec::new(),
        }
    }

    /// Sets the relative deadline.
    pub fn with_deadline(mut self, deadline: Time) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the release period.
    pub fn with_period(mut self, period: Time) -> Self {
        self.period = Some(period);
        self
    }

    /// Returns a copy with all run state cleared.
    ///
    /// Every policy run starts from a pristine copy so the caller's list is
    /// never observed to change.
    pub fn pristine(&self) -> Self {
        Self {
            remaining: self.burst,
            start_time: None,
            finish_time: None,
            executions: Vec::new(),
            ..self.clone()
        }
    }

    /// Whether the task has completed.
    pub fn is_finished(&self) -> bool {
        self.finish_time.is_some()
    }

    /// Turnaround time: finish − arrival. `None` until finished.
    pub fn turnaround_time(&self) -> Option<Time> {
        self.finish_time.map(|finish| finish - self.arrival)
    }

    /// Waiting time: turnaround − burst. `None` until finished.
    pub fn waiting_time(&self) -> Option<Time> {
        self.turnaround_time()
            .map(|turnaround| turnaround - self.burst)
    }

    /// Sum of all recorded execution intervals.
    pub fn executed_time(&self) -> Time {
        self.executions.iter().map(Execution::duration).sum()
    }

    /// Latest end of any recorded execution interval.
    pub fn last_execution_end(&self) -> Option<Time> {
        self.executions.last().map(|e| e.end)
    }

    /// Utilization contribution `burst / period`. `None` if aperiodic.
    pub fn utilization(&self) -> Option<f64> {
        self.period
            .filter(|&p| p > 0)
            .map(|p| self.burst as f64 / p as f64)
    }

    /// Records one dispatch interval. The first one fixes `start_time`.
    pub(crate) fn record_execution(&mut self, start: Time, end: Time) {
        if self.start_time.is_none() {
            self.start_time = Some(start);
        }
        self.executions.push(Execution::new(start, end));
    }
}
