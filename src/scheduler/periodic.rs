//! Release-driven engine shared by Rate Monotonic and EDF.
//!
//! # Algorithm
//! While the clock is below the horizon:
//! 1. Release every task whose next release time has been reached
//!    (first at arrival, then every period) and queue the new instance.
//! 2. Dispatch the highest-priority ready instance (per [`ReadyRule`]) for
//!    `min(remaining, time to next release, time to horizon)`, so the
//!    decision is re-evaluated the moment a release could change it.
//! 3. On completion, compare against the absolute deadline and count a
//!    miss if it was exceeded.
//! 4. If nothing is ready, jump the clock to the next release.
//!
//! Instances still running at the horizon are neither completed nor
//! counted as misses.
//!
//! # Task-level fields
//! A task's `start_time` is the first dispatch of any of its instances and
//! its `executions` hold every slice of every instance. `remaining` and
//! `finish_time` follow the task's first instance (job 0).

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Run;
use crate::dispatching::{ReadyQueue, ReadyRule};
use crate::error::SimulationError;
use crate::feasibility::Schedulability;
use crate::models::{Slice, Task, TaskInstance, Time, Timeline};

/// Release and deadline outcome of a periodic run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodicStats {
    /// Every released instance, in release order.
    pub instances: Vec<TaskInstance>,
    /// Completed instances that finished after their absolute deadline.
    pub deadline_misses: usize,
    /// Instances released before the horizon.
    pub total_jobs: usize,
    /// Utilization-bound check performed before the run.
    pub schedulability: Schedulability,
}

impl PeriodicStats {
    /// Instances of one task.
    pub fn instances_of(&self, task_id: &str) -> Vec<&TaskInstance> {
        self.instances
            .iter()
            .filter(|i| i.task_id == task_id)
            .collect()
    }

    /// Deadline misses attributed to one task.
    pub fn misses_of(&self, task_id: &str) -> usize {
        self.instances
            .iter()
            .filter(|i| i.task_id == task_id && i.missed_deadline())
            .count()
    }
}

pub(crate) fn run<R: ReadyRule>(
    mut tasks: Vec<Task>,
    rule: &R,
    horizon: Time,
    schedulability: Schedulability,
) -> Result<Run, SimulationError> {
    let mut next_release: Vec<Time> = tasks.iter().map(|t| t.arrival).collect();
    let mut released: Vec<u32> = vec![0; tasks.len()];
    let mut instances: Vec<TaskInstance> = Vec::new();
    let mut queue = ReadyQueue::new();
    let mut timeline = Timeline::new();
    let mut deadline_misses = 0;
    let mut now: Time = 0;

    while now < horizon {
        for (i, task) in tasks.iter().enumerate() {
            let Some(period) = task.period else { continue };
            while next_release[i] <= now {
                let inst = TaskInstance::release(i, task, released[i], next_release[i]);
                debug!(
                    policy = rule.name(),
                    task = %task.id,
                    job = inst.job,
                    release = inst.release,
                    "release"
                );
                queue.push(instances.len(), &inst, rule.score(&inst, task));
                instances.push(inst);
                released[i] += 1;
                // Saturated releases lie beyond any horizon
                next_release[i] = next_release[i].saturating_add(period);
            }
        }

        let upcoming = tasks
            .iter()
            .zip(&next_release)
            .filter(|(t, _)| t.period.is_some())
            .map(|(_, &r)| r)
            .min();

        let Some(idx) = queue.peek() else {
            match upcoming {
                Some(release) => {
                    now = release.min(horizon);
                    continue;
                }
                None => break,
            }
        };

        let inst = &mut instances[idx];
        let task = &mut tasks[inst.task_index];
        if now < inst.release || inst.remaining <= 0 {
            return Err(SimulationError::invariant(
                &task.id,
                format!(
                    "job {} selected at {now} (release {}, remaining {})",
                    inst.job, inst.release, inst.remaining
                ),
            ));
        }

        let gap = upcoming.map_or(Time::MAX, |r| r - now);
        let slice = inst.remaining.min(gap).min(horizon - now);
        let end = now + slice;

        debug!(
            policy = rule.name(),
            task = %task.id,
            job = inst.job,
            start = now,
            end,
            "dispatch"
        );
        task.record_execution(now, end);
        timeline.push(Slice::new(&task.id, now, end));
        inst.remaining -= slice;
        if inst.job == 0 {
            task.remaining -= slice;
        }

        if inst.remaining == 0 {
            inst.completion_time = Some(end);
            if inst.job == 0 {
                task.finish_time = Some(end);
            }
            if inst.missed_deadline() {
                deadline_misses += 1;
                debug!(
                    task = %task.id,
                    job = inst.job,
                    completion = end,
                    deadline = ?inst.absolute_deadline,
                    "deadline miss"
                );
            }
            queue.pop();
        }

        now = end;
    }

    let total_jobs = instances.len();
    Ok(Run {
        tasks,
        timeline,
        total_time: now,
        periodic: Some(PeriodicStats {
            instances,
            deadline_misses,
            total_jobs,
            schedulability,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::{EarliestDeadlineRule, RateMonotonicRule};
    use crate::feasibility::{edf_test, rate_monotonic_test};

    fn periodic(id: &str, arrival: Time, burst: Time, period: Time) -> Task {
        Task::new(id, arrival, burst)
            .with_period(period)
            .with_deadline(period)
    }

    fn rm(tasks: Vec<Task>, horizon: Time) -> Run {
        let check = rate_monotonic_test(&tasks);
        run(tasks, &RateMonotonicRule, horizon, check).unwrap()
    }

    fn edf(tasks: Vec<Task>, horizon: Time) -> Run {
        let check = edf_test(&tasks);
        run(tasks, &EarliestDeadlineRule, horizon, check).unwrap()
    }

    #[test]
    fn test_rm_preempts_on_release() {
        // A: C=1, T=4 (high priority); B: C=4, T=10
        let run = rm(vec![periodic("A", 0, 1, 4), periodic("B", 0, 4, 10)], 10);

        assert_eq!(
            run.timeline.triples(),
            vec![
                ("A", 0, 1),
                ("B", 1, 4),
                ("A", 4, 5),
                ("B", 5, 6),
                ("A", 8, 9)
            ]
        );
        let stats = run.periodic.unwrap();
        assert_eq!(stats.total_jobs, 4); // A at 0, 4, 8; B at 0
        assert_eq!(stats.deadline_misses, 0);
        assert_eq!(run.tasks[1].finish_time, Some(6));
    }

    #[test]
    fn test_releases_form_arithmetic_sequence() {
        let run = rm(vec![periodic("A", 3, 1, 5)], 20);
        let stats = run.periodic.unwrap();

        let releases: Vec<Time> = stats.instances.iter().map(|i| i.release).collect();
        assert_eq!(releases, vec![3, 8, 13, 18]);
        assert!(stats.instances.iter().all(|i| i.completion_time.is_some()));
    }

    #[test]
    fn test_rm_misses_when_overloaded() {
        // U = 2/4 + 4/6 ≈ 1.17: B cannot fit
        let run = rm(vec![periodic("A", 0, 2, 4), periodic("B", 0, 4, 6)], 24);
        let stats = run.periodic.unwrap();

        assert!(!stats.schedulability.is_schedulable());
        assert!(stats.deadline_misses > 0);
        assert_eq!(stats.misses_of("A"), 0);
        assert!(stats.misses_of("B") > 0);
    }

    #[test]
    fn test_edf_meets_deadlines_rm_misses() {
        // U = 2/5 + 4/7 ≈ 0.97: above the RM bound, below 1.0
        let tasks = vec![periodic("A", 0, 2, 5), periodic("B", 0, 4, 7)];

        let edf_run = edf(tasks.clone(), 35);
        assert_eq!(edf_run.periodic.unwrap().deadline_misses, 0);

        let rm_run = rm(tasks, 35);
        assert!(rm_run.periodic.unwrap().deadline_misses > 0);
    }

    #[test]
    fn test_horizon_cuts_running_instance() {
        let run = edf(vec![periodic("A", 0, 6, 10)], 4);
        let stats = run.periodic.unwrap();

        assert_eq!(run.timeline.triples(), vec![("A", 0, 4)]);
        assert_eq!(run.total_time, 4);
        assert_eq!(stats.instances[0].remaining, 2);
        assert_eq!(stats.instances[0].completion_time, None);
        assert_eq!(stats.deadline_misses, 0);
        assert_eq!(run.tasks[0].finish_time, None);
        assert_eq!(run.tasks[0].remaining, 2);
    }

    #[test]
    fn test_idle_until_first_release() {
        let run = rm(vec![periodic("A", 7, 2, 10)], 30);

        assert_eq!(
            run.timeline.triples(),
            vec![("A", 7, 9), ("A", 17, 19), ("A", 27, 29)]
        );
        assert_eq!(run.tasks[0].start_time, Some(7));
        assert_eq!(run.total_time, 30);
    }

    #[test]
    fn test_no_deadline_disables_miss_detection() {
        let tasks = vec![
            Task::new("A", 0, 3).with_period(4),
            Task::new("B", 0, 3).with_period(4),
        ];
        let check = rate_monotonic_test(&tasks);
        let run = run(tasks, &RateMonotonicRule, 16, check).unwrap();
        let stats = run.periodic.unwrap();

        assert_eq!(stats.deadline_misses, 0);
        assert!(stats
            .instances
            .iter()
            .all(|i| i.absolute_deadline.is_none()));
    }

    #[test]
    fn test_extreme_period_and_deadline_saturate() {
        let task = Task::new("A", 0, 1)
            .with_period(Time::MAX / 2)
            .with_deadline(Time::MAX);
        let run = edf(vec![task], Time::MAX);
        let stats = run.periodic.unwrap();

        // Releases at 0, MAX/2 and MAX - 1; the next one saturates past the horizon
        let releases: Vec<Time> = stats.instances.iter().map(|i| i.release).collect();
        assert_eq!(releases, vec![0, Time::MAX / 2, Time::MAX - 1]);
        assert_eq!(stats.instances[0].absolute_deadline, Some(Time::MAX));
        assert_eq!(stats.instances[1].absolute_deadline, Some(Time::MAX));
        assert_eq!(stats.deadline_misses, 0);
        assert_eq!(run.total_time, Time::MAX);
    }

    #[test]
    fn test_execution_conserved_per_instance() {
        let run = edf(vec![periodic("A", 0, 2, 5), periodic("B", 1, 3, 8)], 40);
        let stats = run.periodic.unwrap();

        for task in &run.tasks {
            let executed: Time = stats
                .instances_of(&task.id)
                .iter()
                .map(|i| task.burst - i.remaining)
                .sum();
            assert_eq!(task.executed_time(), executed);
        }
        assert!(!run.timeline.has_overlap());
    }
}
