//! Task construction from front-end input, and synthetic workloads.
//!
//! Front ends hand over either [`TaskSpec`] records or parallel columns of
//! integers typed into text fields. Parsing here is lenient in the way an
//! input form is (junk tokens are skipped, a bad quantum falls back to the
//! default); the engine's own validation stays strict.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::{Task, Time};
use crate::scheduler::{DEFAULT_HORIZON, DEFAULT_QUANTUM};
use crate::validation::{ValidationError, ValidationErrorKind};

/// One task construction record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Task identifier.
    pub id: String,
    /// Arrival time.
    pub arrival: Time,
    /// Burst (execution) time.
    pub burst: Time,
    /// Relative deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Time>,
    /// Release period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Time>,
}

impl TaskSpec {
    /// Creates an aperiodic record.
    pub fn new(id: impl Into<String>, arrival: Time, burst: Time) -> Self {
        Self {
            id: id.into(),
            arrival,
            burst,
            deadline: None,
            period: None,
        }
    }

    /// Sets the relative deadline.
    pub fn with_deadline(mut self, deadline: Time) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the period.
    pub fn with_period(mut self, period: Time) -> Self {
        self.period = Some(period);
        self
    }

    /// Builds a fresh task.
    pub fn to_task(&self) -> Task {
        Task {
            deadline: self.deadline,
            period: self.period,
            ..Task::new(self.id.clone(), self.arrival, self.burst)
        }
    }
}

impl From<TaskSpec> for Task {
    fn from(spec: TaskSpec) -> Self {
        spec.to_task()
    }
}

/// Spreadsheet-style name for position `index`: A, B, …, Z, AA, AB, …
pub fn task_name(index: usize) -> String {
    let mut n = index + 1;
    let mut name = Vec::new();
    while n > 0 {
        n -= 1;
        name.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Builds tasks from parallel columns, naming them by position.
///
/// `arrivals` and `bursts` must have equal length. `deadlines` and `periods`
/// may be shorter (the field stays unset for tasks past their end) but not
/// longer.
///
/// # Errors
/// `MismatchedLengths` for every column that does not line up.
pub fn tasks_from_columns(
    arrivals: &[Time],
    bursts: &[Time],
    deadlines: &[Time],
    periods: &[Time],
) -> Result<Vec<Task>, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let n = arrivals.len();

    if bursts.len() != n {
        errors.push(ValidationError::new(
            ValidationErrorKind::MismatchedLengths,
            format!("{n} arrival times but {} burst times", bursts.len()),
        ));
    }
    for (name, column) in [("deadline", deadlines), ("period", periods)] {
        if column.len() > n {
            errors.push(ValidationError::new(
                ValidationErrorKind::MismatchedLengths,
                format!("{} {name} values for {n} tasks", column.len()),
            ));
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(arrivals
        .iter()
        .zip(bursts)
        .enumerate()
        .map(|(i, (&arrival, &burst))| Task {
            deadline: deadlines.get(i).copied(),
            period: periods.get(i).copied(),
            ..Task::new(task_name(i), arrival, burst)
        })
        .collect())
}

/// Parses a comma- or whitespace-separated list of non-negative integers.
///
/// Tokens that are not plain digits are skipped.
pub fn parse_int_list(text: &str) -> Vec<Time> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tok| !tok.is_empty() && tok.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|tok| tok.parse().ok())
        .collect()
}

/// Parses a Round Robin quantum, falling back to the default for empty,
/// unparsable or non-positive input.
pub fn parse_quantum(text: &str) -> Time {
    parse_positive(text).unwrap_or(DEFAULT_QUANTUM)
}

/// Parses a periodic simulation horizon, falling back to the default.
pub fn parse_horizon(text: &str) -> Time {
    parse_positive(text).unwrap_or(DEFAULT_HORIZON)
}

fn parse_positive(text: &str) -> Option<Time> {
    text.trim().parse::<Time>().ok().filter(|&v| v > 0)
}

/// Random task-set generator for experiments and comparisons.
///
/// Generated tasks always pass validation. With a period range configured,
/// every task is periodic with an implicit deadline (deadline = period) and
/// a burst no longer than its period.
///
/// # Example
///
/// ```
/// use cpu_sched_sim::workload::WorkloadGenerator;
///
/// let tasks = WorkloadGenerator::new(4).with_periods(5, 20).generate_seeded(7);
/// assert_eq!(tasks.len(), 4);
/// assert!(tasks.iter().all(|t| t.burst <= t.period.unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadGenerator {
    /// Number of tasks to generate.
    pub task_count: usize,
    /// Latest possible arrival time.
    pub max_arrival: Time,
    /// Inclusive burst range.
    pub burst_range: (Time, Time),
    /// Inclusive period range. `None` = aperiodic tasks.
    pub period_range: Option<(Time, Time)>,
}

impl WorkloadGenerator {
    /// Creates a generator of `task_count` aperiodic tasks arriving in
    /// `[0, 10]` with bursts in `[1, 10]`.
    pub fn new(task_count: usize) -> Self {
        Self {
            task_count,
            max_arrival: 10,
            burst_range: (1, 10),
            period_range: None,
        }
    }

    /// Sets the latest arrival time.
    pub fn with_max_arrival(mut self, max_arrival: Time) -> Self {
        self.max_arrival = max_arrival.max(0);
        self
    }

    /// Sets the inclusive burst range (clamped to at least 1).
    pub fn with_bursts(mut self, min: Time, max: Time) -> Self {
        let min = min.max(1);
        self.burst_range = (min, max.max(min));
        self
    }

    /// Makes tasks periodic with periods in the inclusive range.
    pub fn with_periods(mut self, min: Time, max: Time) -> Self {
        let min = min.max(1);
        self.period_range = Some((min, max.max(min)));
        self
    }

    /// Generates a task set from `rng`.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Vec<Task> {
        (0..self.task_count)
            .map(|i| {
                let arrival = rng.random_range(0..=self.max_arrival);
                let (lo, hi) = self.burst_range;
                match self.period_range {
                    None => Task::new(task_name(i), arrival, rng.random_range(lo..=hi)),
                    Some((p_lo, p_hi)) => {
                        let period = rng.random_range(p_lo..=p_hi);
                        let burst = rng.random_range(lo.min(period)..=hi.min(period));
                        Task::new(task_name(i), arrival, burst)
                            .with_period(period)
                            .with_deadline(period)
                    }
                }
            })
            .collect()
    }

    /// Generates a reproducible task set from `seed`.
    pub fn generate_seeded(&self, seed: u64) -> Vec<Task> {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.generate(&mut rng)
    }
}
