//! Built-in ready rules.
//!
//! | Rule | Priority | Assigned |
//! |------|----------|----------|
//! | RM | Shorter period first | Per task (fixed) |
//! | EDF | Earlier absolute deadline first | Per instance (dynamic) |

use super::{ReadyRule, RuleScore};
use crate::models::{Task, TaskInstance, Time};

/// Rate Monotonic: shorter period = higher priority.
///
/// Tasks without a period rank last.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateMonotonicRule;

impl ReadyRule for RateMonotonicRule {
    fn name(&self) -> &'static str {
        "RM"
    }

    fn score(&self, _instance: &TaskInstance, task: &Task) -> RuleScore {
        task.period.unwrap_or(Time::MAX)
    }
}

/// Earliest Deadline First: earlier absolute deadline = higher priority.
///
/// Instances without a deadline rank last.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarliestDeadlineRule;

impl ReadyRule for EarliestDeadlineRule {
    fn name(&self) -> &'static str {
        "EDF"
    }

    fn score(&self, instance: &TaskInstance, _task: &Task) -> RuleScore {
        instance.absolute_deadline.unwrap_or(Time::MAX)
    }
}
