//! Schedulability analysis for the periodic policies.
//!
//! Both checks are advisory. An unschedulable task set is still simulated;
//! the run simply records the deadline misses it produces.
//!
//! # Theory
//! **Liu & Layland (1973)**: under Rate Monotonic priorities, `n`
//! independent periodic tasks are guaranteed schedulable on one CPU if
//!
//! `U = Σ Cᵢ/Tᵢ ≤ n (2^(1/n) − 1)`
//!
//! | n | Bound |
//! |---|---|
//! | 1 | 1.000 |
//! | 2 | 0.828 |
//! | 3 | 0.780 |
//! | ∞ | ln(2) ≈ 0.693 |
//!
//! Under EDF the exact test for implicit deadlines is `U ≤ 1`.

use serde::{Deserialize, Serialize};

use crate::models::Task;

/// Outcome of a utilization-bound check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Schedulability {
    /// Total utilization `Σ burst / period`.
    pub utilization: f64,
    /// Bound the utilization was compared against.
    pub bound: f64,
}

impl Schedulability {
    /// Whether the utilization is within the bound (`≤`, not `<`).
    pub fn is_schedulable(&self) -> bool {
        self.utilization <= self.bound
    }
}

/// Liu & Layland utilization bound for `n` tasks: `n (2^(1/n) − 1)`.
///
/// Returns `0.0` for `n = 0`.
pub fn liu_layland_bound(n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let nf = n as f64;
    nf * (2.0_f64.powf(1.0 / nf) - 1.0)
}

/// Total utilization of the periodic tasks in `tasks`.
///
/// Tasks without a (positive) period contribute nothing.
pub fn total_utilization(tasks: &[Task]) -> f64 {
    tasks.iter().filter_map(Task::utilization).sum()
}

/// Rate Monotonic check against the Liu & Layland bound.
pub fn rate_monotonic_test(tasks: &[Task]) -> Schedulability {
    let periodic = tasks.iter().filter(|t| t.utilization().is_some()).count();
    Schedulability {
        utilization: total_utilization(tasks),
        bound: liu_layland_bound(periodic),
    }
}

/// EDF check: total utilization must not exceed 1.0.
pub fn edf_test(tasks: &[Task]) -> Schedulability {
    Schedulability {
        utilization: total_utilization(tasks),
        bound: 1.0,
    }
}
