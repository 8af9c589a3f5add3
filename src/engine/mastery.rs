use crate::engine::normalize;
use crate::store::kv_store::KvStore;

const KEY_PREFIX: &str = "mastery.";

/// Per-answer mastery counter over an injected key-value surface. Levels
/// are keyed by the normalized answer text, so "Chat" and "chat " share a
/// history. Absent or unparseable records read as level 0 and never error.
pub struct MasteryStore<S: KvStore> {
    store: S,
}

impl<S: KvStore> MasteryStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn level(&self, answer: &str) -> u32 {
        self.store
            .get(&storage_key(answer))
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Consecutive-correct count goes up by one.
    pub fn record_correct(&mut self, answer: &str) {
        let next = self.level(answer).saturating_add(1);
        self.store.set(&storage_key(answer), &next.to_string());
    }

    /// Any miss (wrong answer, timeout, skip) resets the streak.
    pub fn record_incorrect(&mut self, answer: &str) {
        self.store.set(&storage_key(answer), "0");
    }
}

fn storage_key(answer: &str) -> String {
    format!("{KEY_PREFIX}{}", normalize::answer_key(answer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::kv_store::MemoryKvStore;

    #[test]
    fn test_absent_key_is_level_zero() {
        let mastery = MasteryStore::new(MemoryKvStore::new());
        assert_eq!(mastery.level("chat"), 0);
    }

    #[test]
    fn test_correct_increments_by_one() {
        let mut mastery = MasteryStore::new(MemoryKvStore::new());
        mastery.record_correct("chat");
        assert_eq!(mastery.level("chat"), 1);
        mastery.record_correct("chat");
        assert_eq!(mastery.level("chat"), 2);
    }

    #[test]
    fn test_incorrect_resets_to_zero() {
        let mut mastery = MasteryStore::new(MemoryKvStore::new());
        mastery.record_correct("chat");
        mastery.record_correct("chat");
        mastery.record_incorrect("chat");
        assert_eq!(mastery.level("chat"), 0);
    }

    #[test]
    fn test_keys_are_normalized() {
        let mut mastery = MasteryStore::new(MemoryKvStore::new());
        mastery.record_correct("  Chat");
        assert_eq!(mastery.level("chat"), 1);
        assert_eq!(mastery.level("CHAT "), 1);
    }

    #[test]
    fn test_corrupt_record_reads_as_zero() {
        let mut store = MemoryKvStore::new();
        store.set("mastery.chat", "not a number");
        let mut mastery = MasteryStore::new(store);
        assert_eq!(mastery.level("chat"), 0);
        // And self-heals on the next write
        mastery.record_correct("chat");
        assert_eq!(mastery.level("chat"), 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let mut mastery = MasteryStore::new(MemoryKvStore::new());
        mastery.record_correct("chat");
        mastery.record_correct("chien");
        mastery.record_incorrect("chien");
        assert_eq!(mastery.level("chat"), 1);
        assert_eq!(mastery.level("chien"), 0);
    }
}
