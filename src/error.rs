//! Simulation failures.

use std::fmt;

use crate::scheduler::PolicyKind;
use crate::validation::ValidationError;

/// Why a policy run (or a comparison) did not produce a result.
///
/// Configuration problems are detected before any task state is touched,
/// so a rejected run leaves the caller's input exactly as it was.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// The input failed boundary validation. Carries every detected issue.
    InvalidInput(Vec<ValidationError>),
    /// An engine invariant broke during the run. Indicates a defect.
    InvariantViolation {
        /// Task being dispatched when the violation was detected.
        task_id: String,
        /// What went wrong.
        message: String,
    },
    /// A comparison worker terminated without delivering a result.
    WorkerPanicked(PolicyKind),
}

impl SimulationError {
    pub(crate) fn invariant(task_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            task_id: task_id.into(),
            message: message.into(),
        }
    }

    /// Validation errors, if this is an input rejection.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::InvalidInput(errors) => errors,
            _ => &[],
        }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(errors) => {
                write!(f, "invalid simulation input")?;
                for (i, e) in errors.iter().enumerate() {
                    let sep = if i == 0 { ": " } else { "; " };
                    write!(f, "{sep}{}", e.message)?;
                }
                Ok(())
            }
            Self::InvariantViolation { task_id, message } => {
                write!(
                    f,
                    "engine invariant violated by task '{task_id}': {message}"
                )
            }
            Self::WorkerPanicked(kind) => write!(f, "{} worker panicked", kind.name()),
        }
    }
}

impl std::error::Error for SimulationError {}

impl From<Vec<ValidationError>> for SimulationError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::InvalidInput(errors)
    }
}
