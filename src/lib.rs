//! Discrete-event CPU scheduling simulator.
//!
//! Runs a set of tasks through one of five classic single-CPU policies and
//! reports the resulting timeline together with per-task and aggregate
//! metrics. Several policies can be compared side by side on concurrent
//! workers, each over its own copy of the input.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `TaskInstance`, `Execution`,
//!   `Slice`, `Timeline`
//! - **`scheduler`**: The policies (`Fcfs`, `Sjn`, `RoundRobin`,
//!   `RateMonotonic`, `Edf`), `simulate` and `Metrics`
//! - **`dispatching`**: Ready rules and the ready queue behind RM and EDF
//! - **`feasibility`**: Liu & Layland and EDF utilization tests
//! - **`comparison`**: Concurrent multi-policy runs with a pollable handle
//! - **`config`**: Policy parameters and the serializable request record
//! - **`workload`**: Task construction from input columns, lenient parsing,
//!   random workloads
//! - **`validation`**: Input integrity checks (IDs, times, policy needs)
//! - **`error`**: `SimulationError`
//!
//! # Logging
//!
//! Runs emit [`tracing`] events: `info` at run start and finish, `debug`
//! per dispatch and release, `warn` when a periodic task set exceeds its
//! utilization bound. Install any subscriber to see them.
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//!   Hard-Real-Time Environment"
//! - Buttazzo (2011), "Hard Real-Time Computing Systems"

pub mod comparison;
pub mod config;
pub mod dispatching;
pub mod error;
pub mod feasibility;
pub mod models;
pub mod scheduler;
pub mod validation;
pub mod workload;

pub use error::SimulationError;
pub use scheduler::{simulate, Policy, PolicyKind, SimulationReport};
