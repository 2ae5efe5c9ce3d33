//! Round Robin.
//!
//! # Algorithm
//! 1. Keep a FIFO ready queue, admitting tasks in arrival order.
//! 2. Pop the head and run it for `min(quantum, remaining)`.
//! 3. Admit every task that arrived during (or at the end of) that quantum.
//! 4. If the popped task is unfinished, re-append it after the new arrivals.
//! 5. With an empty queue, jump the clock to the next arrival.
//!
//! Each quantum is one execution interval, so a task may own several
//! non-contiguous intervals.

use std::collections::VecDeque;

use super::{arrival_order, execute, Run};
use crate::error::SimulationError;
use crate::models::{Task, Time, Timeline};

pub(crate) fn run(mut tasks: Vec<Task>, quantum: Time) -> Result<Run, SimulationError> {
    let order = arrival_order(&tasks);
    let mut admitted = 0;
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut timeline = Timeline::new();
    let mut now: Time = 0;

    loop {
        while admitted < order.len() && tasks[order[admitted]].arrival <= now {
            queue.push_back(order[admitted]);
            admitted += 1;
        }

        let Some(i) = queue.pop_front() else {
            match order.get(admitted) {
                Some(&next) => {
                    now = tasks[next].arrival;
                    continue;
                }
                None => break,
            }
        };

        let slice = quantum.min(tasks[i].remaining);
        now = execute(&mut tasks[i], &mut timeline, now, slice)?;

        // Arrivals during this quantum queue ahead of the preempted task
        while admitted < order.len() && tasks[order[admitted]].arrival <= now {
            queue.push_back(order[admitted]);
            admitted += 1;
        }
        if !tasks[i].is_finished() {
            queue.push_back(i);
        }
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
    fn test_rr_quantum_slicing() {
        let tasks = vec![Task::new("A", 0, 5), Task::new("B", 1, 3)];
        let run = run(tasks, 2).unwrap();

        assert_eq!(
            run.timeline.triples(),
            vec![
                ("A", 0, 2),
                ("B", 2, 4),
                ("A", 4, 6),
                ("B", 6, 7),
                ("A", 7, 8),
            ]
        );
        assert_eq!(run.tasks[0].executed_time(), 5);
        assert_eq!(run.tasks[1].executed_time(), 3);
        assert_eq!(run.tasks[0].finish_time, Some(8));
        assert_eq!(run.tasks[1].finish_time, Some(7));
    }

    #[test]
    fn test_rr_new_arrival_before_preempted_task() {
        // B arrives exactly when A's quantum expires: B goes first
        let tasks = vec![Task::new("A", 0, 4), Task::new("B", 2, 1)];
        let run = run(tasks, 2).unwrap();

        assert_eq!(
            run.timeline.triples(),
            vec![("A", 0, 2), ("B", 2, 3), ("A", 3, 5)]
        );
    }

    #[test]
    fn test_rr_single_task_keeps_separate_quanta() {
        let tasks = vec![Task::new("A", 0, 5)];
        let run = run(tasks, 2).unwrap();

        assert_eq!(run.tasks[0].executions.len(), 3);
        assert_eq!(run.timeline.len(), 3);
        assert_eq!(run.tasks[0].start_time, Some(0));
        assert_eq!(run.tasks[0].waiting_time(), Some(0));
    }

    #[test]
    fn test_rr_idle_jump() {
        let tasks = vec![Task::new("A", 0, 1), Task::new("B", 9, 2)];
        let run = run(tasks, 4).unwrap();

        assert_eq!(run.timeline.triples(), vec![("A", 0, 1), ("B", 9, 11)]);
        assert_eq!(run.total_time, 11);
    }

    #[test]
    fn test_rr_large_quantum_matches_fcfs() {
        let tasks = vec![
            Task::new("A", 0, 5),
            Task::new("B", 1, 3),
            Task::new("C", 2, 8),
        ];
        let run = run(tasks, 100).unwrap();

        assert_eq!(
            run.timeline.triples(),
            vec![("A", 0, 5), ("B", 5, 8), ("C", 8, 16)]
        );
    }
}
