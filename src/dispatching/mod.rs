//! Priority rules and ready queue for the periodic policies.
//!
//! Rate Monotonic and EDF share one release/dispatch engine and differ only
//! in how a ready instance is ranked. A [`ReadyRule`] supplies that rank;
//! the [`ReadyQueue`] orders released instances by it.
//!
//! # Usage
//!
//! ```
//! use cpu_sched_sim::dispatching::{EarliestDeadlineRule, ReadyQueue, ReadyRule};
//! use cpu_sched_sim::models::{Task, TaskInstance};
//!
//! let task = Task::new("T1", 0, 2).with_period(10).with_deadline(8);
//! let instance = TaskInstance::release(0, &task, 0, 0);
//!
//! let mut queue = ReadyQueue::new();
//! queue.push(0, &instance, EarliestDeadlineRule.score(&instance, &task));
//! assert_eq!(queue.peek(), Some(0));
//! ```
//!
//! # References
//!
//! - Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//!   Hard-Real-Time Environment"
//! - Buttazzo (2011), "Hard Real-Time Computing Systems", Ch. 4

mod queue;
pub mod rules;

pub use queue::ReadyQueue;
pub use rules::{EarliestDeadlineRule, RateMonotonicRule};

use std::fmt::Debug;

use crate::models::{Task, TaskInstance};

/// Score returned by a ready rule.
///
/// Lower scores = higher priority (dispatched first).
pub type RuleScore = i64;

/// Ranks released instances for dispatch.
///
/// # Score Convention
/// **Lower score = higher priority.** The score of an instance must not
/// change while it waits in the ready queue.
pub trait ReadyRule: Send + Sync + Debug {
    /// Rule name (e.g., "RM", "EDF").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of a released instance of `task`.
    fn score(&self, instance: &TaskInstance, task: &Task) -> RuleScore;
}
