//! Shortest Job Next (non-preemptive).
//!
//! # Algorithm
//! Whenever the CPU is free, pick the arrived, unfinished task with the
//! smallest burst (ties: earlier arrival, then input order) and run it to
//! completion. A shorter job arriving mid-execution waits. If nothing has
//! arrived, jump the clock to the next arrival.
//!
//! # Complexity
//! O(n²).

use super::{execute, Run};
use crate::error::SimulationError;
use crate::models::{Task, Time, Timeline};

pub(crate) fn run(mut tasks: Vec<Task>) -> Result<Run, SimulationError> {
    let mut timeline = Timeline::new();
    let mut now: Time = 0;

    loop {
        let next = tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_finished() && t.arrival <= now)
            .min_by_key(|&(i, t)| (t.burst, t.arrival, i))
            .map(|(i, _)| i);

        match next {
            Some(i) => {
                let burst = tasks[i].remaining;
                now = execute(&mut tasks[i], &mut timeline, now, burst)?;
            }
            None => {
                let next_arrival = tasks
                    .iter()
                    .filter(|t| !t.is_finished())
                    .map(|t| t.arrival)
                    .min();
                match next_arrival {
                    Some(arrival) => now = arrival,
                    None => break,
                }
            }
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

    fn order(run: &Run) -> Vec<&str> {
        run.timeline.triples().into_iter().map(|t| t.0).collect()
    }

    #[test]
    fn test_sjn_non_preemptive_first_dispatch() {
        // Only A has arrived at t=0; C is shorter but arrives later
        let tasks = vec![
            Task::new("A", 0, 8),
            Task::new("B", 1, 4),
            Task::new("C", 2, 2),
        ];
        let run = run(tasks).unwrap();

        assert_eq!(
            run.timeline.triples(),
            vec![("A", 0, 8), ("C", 8, 10), ("B", 10, 14)]
        );
    }

    #[test]
    fn test_sjn_picks_shortest_among_arrived() {
        let tasks = vec![
            Task::new("A", 0, 6),
            Task::new("B", 0, 2),
            Task::new("C", 0, 4),
        ];
        let run = run(tasks).unwrap();

        assert_eq!(order(&run), vec!["B", "C", "A"]);
        assert_eq!(run.tasks[0].waiting_time(), Some(6));
    }

    #[test]
    fn test_sjn_tie_breaks_by_arrival_then_input_order() {
        let tasks = vec![
            Task::new("late", 1, 3),
            Task::new("first", 0, 10),
            Task::new("early", 0, 3),
            Task::new("also_early", 0, 3),
        ];
        let run = run(tasks).unwrap();

        // t=0: early (3) beats first (10); t=3: all arrived, ties at 3 → arrival 0 first
        assert_eq!(order(&run), vec!["early", "also_early", "late", "first"]);
    }

    #[test]
    fn test_sjn_idle_until_arrival() {
        let tasks = vec![Task::new("A", 5, 2), Task::new("B", 20, 1)];
        let run = run(tasks).unwrap();

        assert_eq!(run.timeline.triples(), vec![("A", 5, 7), ("B", 20, 21)]);
        assert_eq!(run.total_time, 21);
    }
}
