use std::collections::{HashSet, VecDeque};

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::provider::PracticeItem;

/// How items move through a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueuePolicy {
    /// Missed items rotate to the tail and come back until answered
    /// correctly; the session ends only when everything has cleared.
    Requeue,
    /// Each item is presented exactly once; misses just count against the
    /// score.
    SinglePass,
}

#[derive(Clone, Debug)]
pub struct QueueEntry {
    pub item: PracticeItem,
    pub attempts: u32,
}

/// Ordered working set for one session. Both policies share the same
/// surface: `current` peeks the head, `mark_correct`/`mark_incorrect`
/// consume or rotate it.
pub struct SessionQueue {
    policy: QueuePolicy,
    entries: VecDeque<QueueEntry>,
    total: usize,
    correct: usize,
    incorrect: usize,
}

impl SessionQueue {
    pub fn new(items: Vec<PracticeItem>, policy: QueuePolicy) -> Self {
        let total = items.len();
        let entries = items
            .into_iter()
            .map(|item| QueueEntry { item, attempts: 0 })
            .collect();
        Self {
            policy,
            entries,
            total,
            correct: 0,
            incorrect: 0,
        }
    }

    pub fn shuffled(mut items: Vec<PracticeItem>, policy: QueuePolicy, rng: &mut SmallRng) -> Self {
        items.shuffle(rng);
        Self::new(items, policy)
    }

    /// Stable-sort due items to the front, preserving relative order within
    /// each partition. Meant to run once, before the first turn.
    pub fn prioritize_due(&mut self, due_ids: &HashSet<String>) {
        if due_ids.is_empty() {
            return;
        }
        let (due, rest): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|entry| due_ids.contains(&entry.item.id));
        self.entries.extend(due);
        self.entries.extend(rest);
    }

    pub fn policy(&self) -> QueuePolicy {
        self.policy
    }

    pub fn current(&self) -> Option<&QueueEntry> {
        self.entries.front()
    }

    pub fn mark_correct(&mut self) {
        if self.entries.pop_front().is_some() {
            self.correct += 1;
        }
    }

    pub fn mark_incorrect(&mut self) {
        match self.policy {
            QueuePolicy::Requeue => {
                if let Some(mut entry) = self.entries.pop_front() {
                    entry.attempts += 1;
                    self.entries.push_back(entry);
                    self.incorrect += 1;
                }
            }
            QueuePolicy::SinglePass => {
                if self.entries.pop_front().is_some() {
                    self.incorrect += 1;
                }
            }
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn correct_count(&self) -> usize {
        self.correct
    }

    pub fn incorrect_count(&self) -> usize {
        self.incorrect
    }

    /// Fraction of the session's work done. Under requeue only cleared
    /// items count; under single-pass every submission advances it.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let done = match self.policy {
            QueuePolicy::Requeue => self.correct,
            QueuePolicy::SinglePass => self.correct + self.incorrect,
        };
        done as f64 / self.total as f64
    }

    #[cfg(test)]
    fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.item.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn item(id: &str) -> PracticeItem {
        PracticeItem {
            id: id.to_string(),
            prompt: format!("prompt {id}"),
            answer: format!("answer {id}"),
            note: None,
        }
    }

    fn items(ids: &[&str]) -> Vec<PracticeItem> {
        ids.iter().map(|id| item(id)).collect()
    }

    #[test]
    fn test_requeue_rotation_scenario() {
        // [A,B]; A wrong, B right, A right => [A,B] -> [B,A] -> [A] -> []
        let mut queue = SessionQueue::new(items(&["A", "B"]), QueuePolicy::Requeue);
        assert_eq!(queue.ids(), vec!["A", "B"]);

        queue.mark_incorrect();
        assert_eq!(queue.ids(), vec!["B", "A"]);
        assert_eq!(queue.current().unwrap().item.id, "B");

        queue.mark_correct();
        assert_eq!(queue.ids(), vec!["A"]);
        assert_eq!(queue.current().unwrap().attempts, 1);

        queue.mark_correct();
        assert!(queue.is_exhausted());
        assert_eq!(queue.correct_count(), 2);
        assert_eq!(queue.incorrect_count(), 1);
    }

    #[test]
    fn test_requeue_conservation() {
        // Queued ids plus cleared count always account for the full set.
        let mut queue = SessionQueue::new(items(&["A", "B", "C"]), QueuePolicy::Requeue);
        let mut cleared = 0;
        for step in 0..5 {
            assert_eq!(queue.ids().len() + cleared, 3);
            if step % 2 == 0 {
                queue.mark_incorrect();
            } else {
                queue.mark_correct();
                cleared += 1;
            }
        }
        assert_eq!(queue.ids().len() + cleared, 3);
    }

    #[test]
    fn test_single_pass_never_reorders() {
        let mut queue = SessionQueue::new(items(&["A", "B", "C"]), QueuePolicy::SinglePass);
        assert_eq!(queue.current().unwrap().item.id, "A");
        queue.mark_incorrect();
        assert_eq!(queue.current().unwrap().item.id, "B");
        queue.mark_correct();
        assert_eq!(queue.current().unwrap().item.id, "C");
        queue.mark_correct();
        assert!(queue.is_exhausted());
        assert_eq!(queue.correct_count(), 2);
        assert!(queue.correct_count() <= queue.total());
    }

    #[test]
    fn test_single_pass_progress_sequence() {
        let mut queue = SessionQueue::new(items(&["A", "B", "C"]), QueuePolicy::SinglePass);
        let mut fractions = Vec::new();
        for _ in 0..3 {
            queue.mark_correct();
            fractions.push(queue.progress());
        }
        assert_eq!(fractions, vec![1.0 / 3.0, 2.0 / 3.0, 1.0]);
    }

    #[test]
    fn test_requeue_progress_counts_only_cleared() {
        let mut queue = SessionQueue::new(items(&["A", "B"]), QueuePolicy::Requeue);
        queue.mark_incorrect();
        assert_eq!(queue.progress(), 0.0);
        queue.mark_correct();
        assert_eq!(queue.progress(), 0.5);
    }

    #[test]
    fn test_due_items_move_to_front_stably() {
        let mut queue = SessionQueue::new(items(&["A", "B", "C", "D"]), QueuePolicy::Requeue);
        let due: HashSet<String> = ["B".to_string(), "D".to_string()].into();
        queue.prioritize_due(&due);
        // Due-first, relative order preserved within each partition
        assert_eq!(queue.ids(), vec!["B", "D", "A", "C"]);
        assert_eq!(queue.total(), 4);
    }

    #[test]
    fn test_empty_due_set_is_noop() {
        let mut queue = SessionQueue::new(items(&["A", "B"]), QueuePolicy::Requeue);
        queue.prioritize_due(&HashSet::new());
        assert_eq!(queue.ids(), vec!["A", "B"]);
    }

    #[test]
    fn test_shuffle_is_reproducible() {
        let mut rng_a = SmallRng::seed_from_u64(42);
        let mut rng_b = SmallRng::seed_from_u64(42);
        let ids = ["A", "B", "C", "D", "E", "F"];
        let queue_a = SessionQueue::shuffled(items(&ids), QueuePolicy::SinglePass, &mut rng_a);
        let queue_b = SessionQueue::shuffled(items(&ids), QueuePolicy::SinglePass, &mut rng_b);
        assert_eq!(queue_a.ids(), queue_b.ids());
    }

    #[test]
    fn test_empty_queue_is_exhausted() {
        let queue = SessionQueue::new(Vec::new(), QueuePolicy::Requeue);
        assert!(queue.is_exhausted());
        assert!(queue.current().is_none());
        assert_eq!(queue.progress(), 0.0);
    }
}
