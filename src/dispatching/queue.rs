//! Priority queue of released instances.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::RuleScore;
use crate::models::{TaskInstance, Time};

/// Heap key. Derived `Ord` compares fields in order: rule score, then
/// earlier release, then lower task index (input order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    score: RuleScore,
    release: Time,
    task_index: usize,
    instance: usize,
}

/// Min-priority queue of ready instances, referenced by position in the
/// run's instance list.
///
/// Ties on the rule score are broken deterministically: earlier release
/// first, then the task that appears first in the input.
#[derive(Debug, Clone, Default)]
pub struct ReadyQueue {
    heap: BinaryHeap<Reverse<Entry>>,
}

impl ReadyQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues instance number `instance` with the given score.
    pub fn push(&mut self, instance: usize, inst: &TaskInstance, score: RuleScore) {
        self.heap.push(Reverse(Entry {
            score,
            release: inst.release,
            task_index: inst.task_index,
            instance,
        }));
    }

    /// Highest-priority instance, without removing it.
    pub fn peek(&self) -> Option<usize> {
        self.heap.peek().map(|Reverse(e)| e.instance)
    }

    /// Removes and returns the highest-priority instance.
    pub fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|Reverse(e)| e.instance)
    }

    /// Number of queued instances.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no instance is ready.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    fn instance(task_index: usize, release: Time) -> TaskInstance {
        let task = Task::new(format!("T{task_index}"), 0, 1).with_period(10);
        TaskInstance::release(task_index, &task, 0, release)
    }

    #[test]
    fn test_lowest_score_first() {
        let mut q = ReadyQueue::new();
        q.push(0, &instance(0, 0), 30);
        q.push(1, &instance(1, 0), 10);
        q.push(2, &instance(2, 0), 20);

        assert_eq!(q.len(), 3);
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), Some(0));
        assert!(q.is_empty());
    }

    #[test]
    fn test_tie_broken_by_release_then_input_order() {
        let mut q = ReadyQueue::new();
        q.push(0, &instance(2, 5), 10);
        q.push(1, &instance(1, 0), 10);
        q.push(2, &instance(0, 0), 10);

        assert_eq!(q.pop(), Some(2)); // release 0, task 0
        assert_eq!(q.pop(), Some(1)); // release 0, task 1
        assert_eq!(q.pop(), Some(0)); // release 5
    }

    #[test]
    fn test_peek_does_not_remove() {
        let mut q = ReadyQueue::new();
        q.push(7, &instance(0, 0), 1);

        assert_eq!(q.peek(), Some(7));
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop(), Some(7));
        assert_eq!(q.peek(), None);
    }
}
