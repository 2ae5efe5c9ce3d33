//! Input validation for simulation runs.
//!
//! Checks the task set and the chosen policy before the engine touches any
//! state. The engine itself assumes validated input: a zero burst or
//! quantum would otherwise stall the clock. Detects:
//! - Duplicate or empty task IDs
//! - Negative arrivals
//! - Non-positive burst, deadline, period, quantum or horizon
//! - Periodic policies run on tasks without a period (or, for EDF, without
//!   a deadline)
//! - Arrivals and bursts whose run could not fit in [`Time`]
//! - Empty task sets, or repeated policies, handed to a comparison

use std::collections::HashSet;

use crate::models::{Task, Time};
use crate::scheduler::{Policy, PolicyKind};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two tasks share the same ID.
    DuplicateId,
    /// A task has an empty ID.
    EmptyId,
    /// A task arrives before t=0.
    NegativeArrival,
    /// A task needs zero or negative CPU time.
    NonPositiveBurst,
    /// A task has a zero or negative relative deadline.
    NonPositiveDeadline,
    /// A task has a zero or negative period.
    NonPositivePeriod,
    /// A periodic policy was selected but a task has no period.
    MissingPeriod,
    /// EDF was selected but a task has no deadline.
    MissingDeadline,
    /// Round Robin quantum is zero or negative.
    NonPositiveQuantum,
    /// Periodic simulation horizon is zero or negative.
    NonPositiveHorizon,
    /// Parallel input columns have different lengths.
    MismatchedLengths,
    /// A comparison was requested on an empty task set.
    EmptyTaskSet,
    /// A comparison lists the same policy twice.
    DuplicatePolicy,
    /// Arrivals and bursts add up past the representable time range.
    TimeOverflow,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates task attributes independently of any policy.
///
/// Checks:
/// 1. No empty or duplicate task IDs
/// 2. Arrival ≥ 0
/// 3. Burst > 0
/// 4. Deadline and period, when present, > 0
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_tasks(tasks: &[Task]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for task in tasks {
        if task.id.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                "Task with empty ID",
            ));
        } else if !ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }

        if task.arrival < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeArrival,
                format!(
                    "Task '{}' arrives at negative time {}",
                    task.id, task.arrival
                ),
            ));
        }

        if task.burst <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveBurst,
                format!("Task '{}' has non-positive burst {}", task.id, task.burst),
            ));
        }

        if let Some(deadline) = task.deadline.filter(|&d| d <= 0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveDeadline,
                format!("Task '{}' has non-positive deadline {deadline}", task.id),
            ));
        }

        if let Some(period) = task.period.filter(|&p| p <= 0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositivePeriod,
                format!("Task '{}' has non-positive period {period}", task.id),
            ));
        }
    }

    into_result(errors)
}

/// Validates policy parameters and the task attributes the policy needs.
pub fn validate_policy(tasks: &[Task], policy: &Policy) -> ValidationResult {
    let mut errors = Vec::new();

    match *policy {
        Policy::Fcfs | Policy::Sjn => check_makespan(tasks, &mut errors),
        Policy::RoundRobin { quantum } => {
            if quantum <= 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NonPositiveQuantum,
                    format!("Round Robin quantum must be positive, got {quantum}"),
                ));
            }
            check_makespan(tasks, &mut errors);
        }
        Policy::RateMonotonic { horizon } | Policy::Edf { horizon } => {
            if horizon <= 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NonPositiveHorizon,
                    format!(
                        "{} simulation horizon must be positive, got {horizon}",
                        policy.kind().name()
                    ),
                ));
            }
            for task in tasks {
                if task.period.is_none() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::MissingPeriod,
                        format!(
                            "Task '{}' has no period, required by {}",
                            task.id,
                            policy.kind().name()
                        ),
                    ));
                }
                if policy.kind() == PolicyKind::Edf && task.deadline.is_none() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::MissingDeadline,
                        format!("Task '{}' has no deadline, required by EDF", task.id),
                    ));
                }
            }
        }
    }

    into_result(errors)
}

/// Validates a single policy run: task attributes plus policy requirements.
pub fn validate_run(tasks: &[Task], policy: &Policy) -> ValidationResult {
    let mut errors = validate_tasks(tasks).err().unwrap_or_default();
    if let Err(policy_errors) = validate_policy(tasks, policy) {
        errors.extend(policy_errors);
    }
    into_result(errors)
}

/// Validates a comparison: a non-empty task set that every policy accepts,
/// with each policy listed at most once.
pub fn validate_comparison(tasks: &[Task], policies: &[Policy]) -> ValidationResult {
    let mut errors = Vec::new();

    if tasks.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyTaskSet,
            "Comparison requires at least one task",
        ));
    }

    let mut kinds = HashSet::new();
    for policy in policies {
        if !kinds.insert(policy.kind()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicatePolicy,
                format!("{} listed more than once", policy.kind().name()),
            ));
        }
    }

    if let Err(task_errors) = validate_tasks(tasks) {
        errors.extend(task_errors);
    }
    for policy in policies {
        if let Err(policy_errors) = validate_policy(tasks, policy) {
            errors.extend(policy_errors);
        }
    }

    into_result(errors)
}

/// Run-to-completion policies finish no later than the latest arrival plus
/// every burst. That sum must be a valid [`Time`].
fn check_makespan(tasks: &[Task], errors: &mut Vec<ValidationError>) {
    let latest = tasks.iter().map(|t| t.arrival).max().unwrap_or(0);
    let fits = tasks
        .iter()
        .try_fold(latest, |acc: Time, t| acc.checked_add(t.burst.max(0)))
        .is_some();
    if !fits {
        errors.push(ValidationError::new(
            ValidationErrorKind::TimeOverflow,
            "Latest arrival plus total burst exceeds the representable time range",
        ));
    }
}

fn into_result(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
