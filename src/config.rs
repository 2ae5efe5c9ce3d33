//! Run configuration and the serializable request record.
//!
//! # Example
//!
//! ```
//! use cpu_sched_sim::config::SimulationRequest;
//! use cpu_sched_sim::scheduler::PolicyKind;
//!
//! let request: SimulationRequest = serde_json::from_str(r#"{
//!     "tasks": [
//!         {"id": "A", "arrival": 0, "burst": 5},
//!         {"id": "B", "arrival": 1, "burst": 3}
//!     ],
//!     "policies": ["fcfs", "round_robin"],
//!     "config": {"quantum": 3}
//! }"#).unwrap();
//!
//! let comparison = request.run().unwrap();
//! assert!(comparison.get(PolicyKind::RoundRobin).is_some());
//! ```

use serde::{Deserialize, Serialize};

use crate::comparison::{compare, Comparison};
use crate::error::SimulationError;
use crate::models::{Task, Time};
use crate::scheduler::{Policy, PolicyKind, DEFAULT_HORIZON, DEFAULT_QUANTUM};
use crate::workload::TaskSpec;

/// Policy parameters shared by a run or a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Round Robin time quantum.
    pub quantum: Time,
    /// Simulation horizon for Rate Monotonic and EDF.
    pub horizon: Time,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            quantum: DEFAULT_QUANTUM,
            horizon: DEFAULT_HORIZON,
        }
    }
}

impl SimulationConfig {
    /// Creates the default configuration (quantum 2, horizon 100).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Round Robin quantum.
    pub fn with_quantum(mut self, quantum: Time) -> Self {
        self.quantum = quantum;
        self
    }

    /// Sets the periodic simulation horizon.
    pub fn with_horizon(mut self, horizon: Time) -> Self {
        self.horizon = horizon;
        self
    }

    /// Materializes `kind` with this configuration's parameters.
    pub fn policy(&self, kind: PolicyKind) -> Policy {
        match kind {
            PolicyKind::Fcfs => Policy::Fcfs,
            PolicyKind::Sjn => Policy::Sjn,
            PolicyKind::RoundRobin => Policy::RoundRobin {
                quantum: self.quantum,
            },
            PolicyKind::RateMonotonic => Policy::RateMonotonic {
                horizon: self.horizon,
            },
            PolicyKind::Edf => Policy::Edf {
                horizon: self.horizon,
            },
        }
    }

    /// Materializes several policies.
    pub fn policies(&self, kinds: &[PolicyKind]) -> Vec<Policy> {
        kinds.iter().map(|&k| self.policy(k)).collect()
    }
}

/// Input bundle handed over by a front end: task records, the policies to
/// run and their parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Task construction records.
    pub tasks: Vec<TaskSpec>,
    /// Policies to run. Defaults to all five.
    #[serde(default = "all_policies")]
    pub policies: Vec<PolicyKind>,
    /// Policy parameters.
    #[serde(default)]
    pub config: SimulationConfig,
}

fn all_policies() -> Vec<PolicyKind> {
    PolicyKind::ALL.to_vec()
}

impl SimulationRequest {
    /// Creates a request for all policies with the default configuration.
    pub fn new(tasks: Vec<TaskSpec>) -> Self {
        Self {
            tasks,
            policies: all_policies(),
            config: SimulationConfig::default(),
        }
    }

    /// Restricts the request to the given policies.
    pub fn with_policies(mut self, policies: Vec<PolicyKind>) -> Self {
        self.policies = policies;
        self
    }

    /// Sets the policy parameters.
    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds fresh tasks from the records.
    pub fn build_tasks(&self) -> Vec<Task> {
        self.tasks.iter().map(TaskSpec::to_task).collect()
    }

    /// Runs every requested policy and collects the reports.
    pub fn run(&self) -> Result<Comparison, SimulationError> {
        compare(&self.build_tasks(), &self.config.policies(&self.policies))
    }
}
