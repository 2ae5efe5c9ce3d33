//! CPU scheduling policies and run metrics.
//!
//! Five interchangeable policies consume a task set and produce a timeline
//! plus per-task outcomes. Every run works on pristine copies of the
//! caller's tasks, so repeated runs over the same input are side-effect
//! free and can execute concurrently.
//!
//! | Policy | Preemptive | Selection |
//! |--------|-----------|-----------|
//! | FCFS | no | arrival order |
//! | SJN | no | shortest burst among arrived tasks |
//! | Round Robin | yes (quantum) | FIFO ready queue |
//! | Rate Monotonic | yes (release) | shortest period |
//! | EDF | yes (release) | earliest absolute deadline |
//!
//! # Example
//!
//! ```
//! use cpu_sched_sim::models::Task;
//! use cpu_sched_sim::scheduler::{simulate, Policy};
//!
//! let tasks = vec![Task::new("A", 0, 5), Task::new("B", 1, 3), Task::new("C", 2, 8)];
//! let report = simulate(&tasks, &Policy::Fcfs).unwrap();
//!
//! assert_eq!(report.timeline.triples(), vec![("A", 0, 5), ("B", 5, 8), ("C", 8, 16)]);
//! assert!((report.metrics.avg_waiting - 10.0 / 3.0).abs() < 1e-10);
//! // The caller's list is untouched
//! assert!(tasks.iter().all(|t| t.finish_time.is_none()));
//! ```
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Buttazzo (2011), "Hard Real-Time Computing Systems", Ch. 4

mod fcfs;
mod metrics;
mod periodic;
mod round_robin;
mod sjn;

pub use metrics::Metrics;
pub use periodic::PeriodicStats;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dispatching::{EarliestDeadlineRule, RateMonotonicRule};
use crate::error::SimulationError;
use crate::feasibility;
use crate::models::{Slice, Task, Time, Timeline};
use crate::validation::validate_run;

/// Round Robin quantum used when none (or an invalid one) is supplied.
pub const DEFAULT_QUANTUM: Time = 2;

/// Periodic simulation horizon used when none is supplied.
pub const DEFAULT_HORIZON: Time = 100;

/// A scheduling policy together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Policy {
    /// First-Come-First-Served (non-preemptive).
    Fcfs,
    /// Shortest Job Next (non-preemptive).
    Sjn,
    /// Round Robin with a fixed time quantum.
    RoundRobin {
        /// Time slice granted per dispatch.
        #[serde(default = "default_quantum")]
        quantum: Time,
    },
    /// Rate Monotonic over periodic releases.
    RateMonotonic {
        /// Simulated time at which the run stops.
        #[serde(default = "default_horizon")]
        horizon: Time,
    },
    /// Earliest Deadline First over periodic releases.
    Edf {
        /// Simulated time at which the run stops.
        #[serde(default = "default_horizon")]
        horizon: Time,
    },
}

fn default_quantum() -> Time {
    DEFAULT_QUANTUM
}

fn default_horizon() -> Time {
    DEFAULT_HORIZON
}

/// Parameter-free identity of a [`Policy`], used as a result key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// First-Come-First-Served.
    Fcfs,
    /// Shortest Job Next.
    Sjn,
    /// Round Robin.
    RoundRobin,
    /// Rate Monotonic.
    RateMonotonic,
    /// Earliest Deadline First.
    Edf,
}

impl PolicyKind {
    /// All policies, in presentation order.
    pub const ALL: [PolicyKind; 5] = [
        PolicyKind::Fcfs,
        PolicyKind::Sjn,
        PolicyKind::RoundRobin,
        PolicyKind::RateMonotonic,
        PolicyKind::Edf,
    ];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fcfs => "FCFS",
            Self::Sjn => "SJN",
            Self::RoundRobin => "Round Robin",
            Self::RateMonotonic => "Rate Monotonic",
            Self::Edf => "EDF",
        }
    }

    /// Whether the policy simulates periodic releases up to a horizon.
    pub fn is_periodic(&self) -> bool {
        matches!(self, Self::RateMonotonic | Self::Edf)
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Policy {
    /// Round Robin with [`DEFAULT_QUANTUM`].
    pub fn round_robin() -> Self {
        Self::RoundRobin {
            quantum: DEFAULT_QUANTUM,
        }
    }

    /// Rate Monotonic with [`DEFAULT_HORIZON`].
    pub fn rate_monotonic() -> Self {
        Self::RateMonotonic {
            horizon: DEFAULT_HORIZON,
        }
    }

    /// EDF with [`DEFAULT_HORIZON`].
    pub fn edf() -> Self {
        Self::Edf {
            horizon: DEFAULT_HORIZON,
        }
    }

    /// The policy's identity without parameters.
    pub fn kind(&self) -> PolicyKind {
        match self {
            Self::Fcfs => PolicyKind::Fcfs,
            Self::Sjn => PolicyKind::Sjn,
            Self::RoundRobin { .. } => PolicyKind::RoundRobin,
            Self::RateMonotonic { .. } => PolicyKind::RateMonotonic,
            Self::Edf { .. } => PolicyKind::Edf,
        }
    }

    /// Runs this policy over `tasks`. See [`simulate`].
    pub fn run(&self, tasks: &[Task]) -> Result<SimulationReport, SimulationError> {
        simulate(tasks, self)
    }
}

/// Everything one policy run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Policy that produced this report.
    pub policy: Policy,
    /// Private copies of the input tasks with run state filled in.
    pub tasks: Vec<Task>,
    /// Gantt chart of the run.
    pub timeline: Timeline,
    /// Simulated time at which the run stopped.
    pub total_time: Time,
    /// Release, miss and schedulability data (RM/EDF only).
    pub periodic: Option<PeriodicStats>,
    /// Aggregate metrics.
    pub metrics: Metrics,
}

impl SimulationReport {
    /// Finds a task by ID.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

/// Raw engine output before metrics are attached.
pub(crate) struct Run {
    pub tasks: Vec<Task>,
    pub timeline: Timeline,
    pub total_time: Time,
    pub periodic: Option<PeriodicStats>,
}

/// Validates `tasks` for `policy`, then runs the policy on pristine copies.
///
/// # Errors
/// [`SimulationError::InvalidInput`] if validation fails (nothing is run);
/// [`SimulationError::InvariantViolation`] if the engine detects a defect.
pub fn simulate(tasks: &[Task], policy: &Policy) -> Result<SimulationReport, SimulationError> {
    validate_run(tasks, policy)?;

    let kind = policy.kind();
    let copies: Vec<Task> = tasks.iter().map(Task::pristine).collect();
    info!(
        policy = kind.name(),
        task_count = copies.len(),
        "starting simulation"
    );

    let run = match *policy {
        Policy::Fcfs => fcfs::run(copies)?,
        Policy::Sjn => sjn::run(copies)?,
        Policy::RoundRobin { quantum } => round_robin::run(copies, quantum)?,
        Policy::RateMonotonic { horizon } => {
            let check = feasibility::rate_monotonic_test(&copies);
            warn_if_unschedulable(kind, &check);
            periodic::run(copies, &RateMonotonicRule, horizon, check)?
        }
        Policy::Edf { horizon } => {
            let check = feasibility::edf_test(&copies);
            warn_if_unschedulable(kind, &check);
            periodic::run(copies, &EarliestDeadlineRule, horizon, check)?
        }
    };

    let mut metrics = Metrics::calculate(&run.tasks);
    if let Some(stats) = &run.periodic {
        let (misses, jobs) = (stats.deadline_misses, stats.total_jobs);
        metrics = metrics.with_deadline_stats(misses, jobs);
    }

    info!(
        policy = kind.name(),
        total_time = run.total_time,
        slices = run.timeline.len(),
        avg_waiting = metrics.avg_waiting,
        cpu_utilization = metrics.cpu_utilization,
        "simulation finished"
    );

    Ok(SimulationReport {
        policy: *policy,
        tasks: run.tasks,
        timeline: run.timeline,
        total_time: run.total_time,
        periodic: run.periodic,
        metrics,
    })
}

fn warn_if_unschedulable(kind: PolicyKind, check: &feasibility::Schedulability) {
    if !check.is_schedulable() {
        warn!(
            policy = kind.name(),
            utilization = check.utilization,
            bound = check.bound,
            "task set may not be schedulable; deadline misses are likely"
        );
    }
}

/// Dispatches `task` at `start` for `run_for` units and records the slice.
///
/// Returns the slice end. Completes the task when its remaining time
/// reaches zero.
pub(crate) fn execute(
    task: &mut Task,
    timeline: &mut Timeline,
    start: Time,
    run_for: Time,
) -> Result<Time, SimulationError> {
    if start < task.arrival {
        return Err(SimulationError::invariant(
            &task.id,
            format!("dispatched at {start} before arrival at {}", task.arrival),
        ));
    }
    if run_for <= 0 || run_for > task.remaining {
        return Err(SimulationError::invariant(
            &task.id,
            format!("slice of {run_for} with {} remaining", task.remaining),
        ));
    }

    let Some(end) = start.checked_add(run_for) else {
        return Err(SimulationError::invariant(
            &task.id,
            format!("slice end overflows at {start} + {run_for}"),
        ));
    };
    debug!(task = %task.id, start, end, "dispatch");
    task.record_execution(start, end);
    task.remaining -= run_for;
    if task.remaining == 0 {
        task.finish_time = Some(end);
    }
    timeline.push(Slice::new(&task.id, start, end));
    Ok(end)
}

/// Task indices ordered by arrival, ties kept in input order.
pub(crate) fn arrival_order(tasks: &[Task]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..tasks.len()).collect();
    order.sort_by_key(|&i| tasks[i].arrival);
    order
}


#[cfg(test)]
mod logging_tests {
    use std::fmt;
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Level, Metadata, Subscriber};

    use super::*;

    /// Level and message of every event, in emission order.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<(Level, String)>>>);

    struct MessageVisitor(String);

    impl Visit for MessageVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    impl Subscriber for Capture {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _: &Attributes<'_>) -> Id {
            Id::from_u64(1)
        }

        fn record(&self, _: &Id, _: &Record<'_>) {}

        fn record_follows_from(&self, _: &Id, _: &Id) {}

        fn event(&self, event: &Event<'_>) {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            if let Ok(mut events) = self.0.lock() {
                events.push((*event.metadata().level(), visitor.0));
            }
        }

        fn enter(&self, _: &Id) {}

        fn exit(&self, _: &Id) {}
    }

    fn capture(tasks: &[Task], policy: Policy) -> Vec<(Level, String)> {
        let sink = Capture::default();
        tracing::subscriber::with_default(sink.clone(), || {
            simulate(tasks, &policy).unwrap();
        });
        let events = sink.0.lock().unwrap().clone();
        events
    }

    #[test]
    fn test_unschedulable_warning_precedes_first_dispatch() {
        // U = 2/4 + 4/6 ≈ 1.17
        let tasks = vec![
            Task::new("A", 0, 2).with_period(4).with_deadline(4),
            Task::new("B", 0, 4).with_period(6).with_deadline(6),
        ];

        for policy in [Policy::rate_monotonic(), Policy::edf()] {
            let events = capture(&tasks, policy);
            let warning = events
                .iter()
                .position(|(level, _)| *level == Level::WARN)
                .unwrap();
            let first_dispatch = events
                .iter()
                .position(|(_, msg)| msg == "dispatch")
                .unwrap();

            assert!(events[warning].1.contains("not be schedulable"));
            assert!(warning < first_dispatch, "{} warned late", policy.kind());
        }
    }

    #[test]
    fn test_schedulable_set_does_not_warn() {
        let tasks = vec![Task::new("A", 0, 1).with_period(4).with_deadline(4)];

        let events = capture(&tasks, Policy::rate_monotonic());
        assert!(events.iter().all(|(level, _)| *level != Level::WARN));
        assert!(events.iter().any(|(level, _)| *level == Level::INFO));
    }
}
