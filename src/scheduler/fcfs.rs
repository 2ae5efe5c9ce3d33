//! First-Come-First-Served.
//!
//! # Algorithm
//! 1. Stable-sort tasks by arrival (ties keep input order).
//! 2. Dispatch in that order; each task runs its full burst.
//! 3. If the next task has not arrived, jump the clock to its arrival.
//!
//! # Complexity
//! O(n log n).

use super::{arrival_order, execute, Run};
use crate::error::SimulationError;
use crate::models::{Task, Time, Timeline};

pub(crate) fn run(mut tasks: Vec<Task>) -> Result<Run, SimulationError> {
    let mut timeline = Timeline::new();
    let mut now: Time = 0;

    for i in arrival_order(&tasks) {
        let task = &mut tasks[i];
        now = now.max(task.arrival);
        let burst = task.remaining;
        now = execute(task, &mut timeline, now, burst)?;
    }

    Ok(Run {
        tasks,
        timeline,
        total_time: now,
        periodic: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fcfs_reference_example() {
        let tasks = vec![
            Task::new("A", 0, 5),
            Task::new("B", 1, 3),
            Task::new("C", 2, 8),
        ];
        let run = run(tasks).unwrap();

        assert_eq!(
            run.timeline.triples(),
            vec![("A", 0, 5), ("B", 5, 8), ("C", 8, 16)]
        );
        let done = &run.tasks;
        let waiting: Vec<_> = done.iter().filter_map(Task::waiting_time).collect();
        let turnaround: Vec<_> = done.iter().filter_map(Task::turnaround_time).collect();
        assert_eq!(waiting, vec![0, 4, 6]);
        assert_eq!(turnaround, vec![5, 7, 14]);
        assert_eq!(run.total_time, 16);
    }

    #[test]
    fn test_fcfs_idle_gap_jumps_to_arrival() {
        let tasks = vec![Task::new("A", 0, 2), Task::new("B", 10, 3)];
        let run = run(tasks).unwrap();

        assert_eq!(run.timeline.triples(), vec![("A", 0, 2), ("B", 10, 13)]);
        assert_eq!(run.tasks[1].start_time, Some(10));
        assert_eq!(run.tasks[1].waiting_time(), Some(0));
    }

    #[test]
    fn test_fcfs_stable_on_equal_arrival() {
        let tasks = vec![
            Task::new("X", 4, 1),
            Task::new("Y", 0, 1),
            Task::new("Z", 4, 1),
        ];
        let run = run(tasks).unwrap();

        let order: Vec<_> = run.timeline.triples().into_iter().map(|t| t.0).collect();
        assert_eq!(order, vec!["Y", "X", "Z"]);
    }

    #[test]
    fn test_fcfs_one_interval_per_task() {
        let tasks = vec![Task::new("A", 0, 4), Task::new("B", 0, 4)];
        let run = run(tasks).unwrap();

        for task in &run.tasks {
            assert_eq!(task.executions.len(), 1);
            assert_eq!(task.executed_time(), task.burst);
            assert_eq!(task.remaining, 0);
        }
    }
}
