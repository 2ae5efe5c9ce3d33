//! Side-by-side runs of several policies over one task set.
//!
//! Each policy runs on its own worker thread over its own deep copy of the
//! input, so workers share no mutable state and the caller's tasks are
//! never touched. [`spawn`] returns immediately with a [`ComparisonHandle`]
//! the caller can poll; [`compare`] blocks until every worker is done.
//!
//! # Example
//!
//! ```
//! use cpu_sched_sim::comparison::spawn;
//! use cpu_sched_sim::models::Task;
//! use cpu_sched_sim::scheduler::{Policy, PolicyKind};
//!
//! let tasks = vec![Task::new("A", 0, 8), Task::new("B", 1, 4), Task::new("C", 2, 2)];
//! let handle = spawn(&tasks, &[Policy::Fcfs, Policy::Sjn]).unwrap();
//!
//! // ... the caller stays responsive while the workers run ...
//! let comparison = handle.join().unwrap();
//! assert_eq!(comparison.best_by(|m| m.avg_waiting), Some(PolicyKind::Sjn));
//! ```

use std::collections::BTreeMap;
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SimulationError;
use crate::models::Task;
use crate::scheduler::{simulate, Metrics, Policy, PolicyKind, SimulationReport};
use crate::validation::validate_comparison;

/// Reports of a completed comparison, keyed by policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    reports: BTreeMap<PolicyKind, SimulationReport>,
}

impl Comparison {
    /// Report of one policy.
    pub fn get(&self, kind: PolicyKind) -> Option<&SimulationReport> {
        self.reports.get(&kind)
    }

    /// Number of policies compared.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether no policy was compared.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Reports in presentation order.
    pub fn iter(&self) -> impl Iterator<Item = (PolicyKind, &SimulationReport)> {
        self.reports.iter().map(|(&k, r)| (k, r))
    }

    /// Metrics of every policy, in presentation order.
    pub fn metrics(&self) -> Vec<(PolicyKind, &Metrics)> {
        self.iter().map(|(k, r)| (k, &r.metrics)).collect()
    }

    /// Policy with the lowest value of `key`. Ties go to the earlier policy.
    pub fn best_by<F>(&self, key: F) -> Option<PolicyKind>
    where
        F: Fn(&Metrics) -> f64,
    {
        self.iter()
            .min_by(|(_, a), (_, b)| key(&a.metrics).total_cmp(&key(&b.metrics)))
            .map(|(k, _)| k)
    }

    /// Consumes the comparison, yielding the report map.
    pub fn into_reports(self) -> BTreeMap<PolicyKind, SimulationReport> {
        self.reports
    }
}

type Worker = (
    PolicyKind,
    JoinHandle<Result<SimulationReport, SimulationError>>,
);

/// Pending comparison. Poll with [`is_finished`](Self::is_finished) or
/// [`try_join`](Self::try_join), or block with [`join`](Self::join).
#[derive(Debug)]
pub struct ComparisonHandle {
    workers: Vec<Worker>,
}

impl ComparisonHandle {
    /// Number of policy workers.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether the handle has no workers.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Number of workers that have terminated.
    pub fn finished_count(&self) -> usize {
        self.workers.iter().filter(|(_, h)| h.is_finished()).count()
    }

    /// Whether every worker has terminated. Never blocks.
    pub fn is_finished(&self) -> bool {
        self.workers.iter().all(|(_, h)| h.is_finished())
    }

    /// Collects the result if every worker is done, otherwise hands the
    /// handle back.
    pub fn try_join(self) -> Result<Result<Comparison, SimulationError>, Self> {
        if self.is_finished() {
            Ok(self.join())
        } else {
            Err(self)
        }
    }

    /// Waits for every worker and collects the reports.
    ///
    /// # Errors
    /// The first failing policy's error, in submission order. A worker that
    /// panicked yields [`SimulationError::WorkerPanicked`].
    pub fn join(self) -> Result<Comparison, SimulationError> {
        let mut reports = BTreeMap::new();
        let mut first_error = None;

        for (kind, handle) in self.workers {
            let outcome = handle
                .join()
                .unwrap_or_else(|_| Err(SimulationError::WorkerPanicked(kind)));
            match outcome {
                Ok(report) => {
                    reports.insert(kind, report);
                }
                Err(e) => {
                    warn!(policy = kind.name(), error = %e, "comparison worker failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(Comparison { reports }),
        }
    }
}

/// Validates the comparison, then starts one worker per policy.
///
/// # Errors
/// [`SimulationError::InvalidInput`] if the task set is empty, a policy is
/// listed twice, or any policy rejects the tasks. No worker is started.
pub fn spawn(tasks: &[Task], policies: &[Policy]) -> Result<ComparisonHandle, SimulationError> {
    validate_comparison(tasks, policies)?;
    info!(
        task_count = tasks.len(),
        policy_count = policies.len(),
        "starting comparison"
    );

    let workers = policies
        .iter()
        .map(|&policy| {
            let tasks = tasks.to_vec();
            let handle = thread::spawn(move || simulate(&tasks, &policy));
            (policy.kind(), handle)
        })
        .collect();

    Ok(ComparisonHandle { workers })
}

/// Runs every policy concurrently and waits for all reports.
pub fn compare(tasks: &[Task], policies: &[Policy]) -> Result<Comparison, SimulationError> {
    spawn(tasks, policies)?.join()
}
