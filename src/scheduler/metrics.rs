//! Run quality metrics.
//!
//! Computes aggregate performance indicators from the tasks of a completed
//! run.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Avg Waiting | Mean of (turnaround − burst) over finished tasks |
//! | Avg Turnaround | Mean of (finish − arrival) over finished tasks |
//! | CPU Utilization | Executed time ÷ latest finish or execution end, in % |
//! | Deadline Misses | Completed instances that overran their deadline (RM/EDF) |
//! | Miss Rate | Misses ÷ released instances, in % (RM/EDF) |
//!
//! Every ratio is guarded: an empty denominator yields 0, never NaN.

use serde::{Deserialize, Serialize};

use crate::models::Task;

/// Aggregate performance indicators of one run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    /// Mean waiting time over finished tasks.
    pub avg_waiting: f64,
    /// Mean turnaround time over finished tasks.
    pub avg_turnaround: f64,
    /// Busy share of elapsed time (0.0..=100.0).
    pub cpu_utilization: f64,
    /// Number of tasks that finished.
    pub completed_tasks: usize,
    /// Deadline misses (periodic policies only).
    pub deadline_misses: Option<usize>,
    /// Released instances (periodic policies only).
    pub total_jobs: Option<usize>,
    /// `deadline_misses / total_jobs × 100` (periodic policies only).
    pub miss_rate: Option<f64>,
}

impl Metrics {
    /// Computes waiting, turnaround and utilization from run tasks.
    ///
    /// Tasks without a finish time are excluded from the averages. If no
    /// task finished, every metric is 0.
    pub fn calculate(tasks: &[Task]) -> Self {
        let mut total_waiting: f64 = 0.0;
        let mut total_turnaround: f64 = 0.0;
        let mut completed: usize = 0;
        let mut busy: i64 = 0;
        let mut elapsed: i64 = 0;

        for task in tasks {
            busy += task.executed_time();
            if let Some(end) = task.last_execution_end() {
                elapsed = elapsed.max(end);
            }

            if let Some(finish) = task.finish_time {
                let turnaround = finish - task.arrival;
                completed += 1;
                elapsed = elapsed.max(finish);
                total_waiting += (turnaround - task.burst) as f64;
                total_turnaround += turnaround as f64;
            }
        }

        if completed == 0 {
            return Self::default();
        }

        let cpu_utilization = if elapsed <= 0 {
            0.0
        } else {
            busy as f64 / elapsed as f64 * 100.0
        };

        Self {
            avg_waiting: total_waiting / completed as f64,
            avg_turnaround: total_turnaround / completed as f64,
            cpu_utilization,
            completed_tasks: completed,
            deadline_misses: None,
            total_jobs: None,
            miss_rate: None,
        }
    }

    /// Attaches periodic deadline statistics.
    pub fn with_deadline_stats(mut self, deadline_misses: usize, total_jobs: usize) -> Self {
        self.deadline_misses = Some(deadline_misses);
        self.total_jobs = Some(total_jobs);
        self.miss_rate = Some(if total_jobs == 0 {
            0.0
        } else {
            deadline_misses as f64 / total_jobs as f64 * 100.0
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(id: &str, arrival: i64, burst: i64, runs: &[(i64, i64)]) -> Task {
        let mut task = Task::new(id, arrival, burst);
        for &(start, end) in runs {
            task.record_execution(start, end);
        }
        task.remaining = 0;
        task.finish_time = runs.last().map(|&(_, end)| end);
        task
    }

    #[test]
    fn test_metrics_basic() {
        let tasks = vec![
            finished("A", 0, 5, &[(0, 5)]),
            finished("B", 1, 3, &[(5, 8)]),
            finished("C", 2, 8, &[(8, 16)]),
        ];

        let m = Metrics::calculate(&tasks);
        assert!((m.avg_waiting - 10.0 / 3.0).abs() < 1e-10); // (0+4+6)/3
        assert!((m.avg_turnaround - 26.0 / 3.0).abs() < 1e-10); // (5+7+14)/3
        assert!((m.cpu_utilization - 100.0).abs() < 1e-10);
        assert_eq!(m.completed_tasks, 3);
        assert_eq!(m.deadline_misses, None);
        assert_eq!(m.miss_rate, None);
    }

    #[test]
    fn test_metrics_idle_lowers_utilization() {
        let tasks = vec![
            finished("A", 0, 2, &[(0, 2)]),
            finished("B", 6, 2, &[(6, 8)]),
        ];

        let m = Metrics::calculate(&tasks);
        // 4 busy over 8 elapsed
        assert!((m.cpu_utilization - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_unfinished_tasks_excluded_from_averages() {
        let mut pending = Task::new("P", 0, 10);
        pending.record_execution(4, 6);
        pending.remaining = 8;
        let tasks = vec![finished("A", 0, 4, &[(0, 4)]), pending];

        let m = Metrics::calculate(&tasks);
        assert_eq!(m.completed_tasks, 1);
        assert!((m.avg_waiting - 0.0).abs() < 1e-10);
        assert!((m.avg_turnaround - 4.0).abs() < 1e-10);
        // Busy 6 over elapsed 6 (latest execution end)
        assert!((m.cpu_utilization - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_metrics_zero_guard() {
        let m = Metrics::calculate(&[]);
        assert_eq!(m.avg_waiting, 0.0);
        assert_eq!(m.avg_turnaround, 0.0);
        assert_eq!(m.cpu_utilization, 0.0);
        assert!(!m.avg_waiting.is_nan());

        let never_ran = vec![Task::new("A", 0, 3)];
        assert_eq!(Metrics::calculate(&never_ran), Metrics::default());
    }

    #[test]
    fn test_deadline_stats() {
        let m = Metrics::default().with_deadline_stats(3, 12);
        assert_eq!(m.deadline_misses, Some(3));
        assert_eq!(m.total_jobs, Some(12));
        assert!((m.miss_rate.unwrap() - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_deadline_stats_zero_jobs() {
        let m = Metrics::default().with_deadline_stats(0, 0);
        assert_eq!(m.miss_rate, Some(0.0));
    }
}
