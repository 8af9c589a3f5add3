use chrono::NaiveDate;

use crate::store::kv_store::KvStore;

const KEY_PREFIX: &str = "srs.";

/// Spaced-repetition scheduling boundary for deck-review mode. Due ids
/// bias the session queue toward review-ready material; ratings flow back
/// after each cleared item. Both directions are best-effort: failures must
/// never reach the session state machine.
pub trait SchedulingSink {
    /// Ids due for review today. Empty on failure or when scheduling is
    /// disabled.
    fn fetch_due_ids(&self, deck: &str) -> Vec<String>;

    /// Fire-and-forget rating report, 1 (failed) to 4 (easy).
    fn submit_rating(&mut self, deck: &str, item_id: &str, rating: u8);
}

/// Disabled scheduling: nothing due, ratings dropped.
#[derive(Default)]
pub struct NoopSink;

impl SchedulingSink for NoopSink {
    fn fetch_due_ids(&self, _deck: &str) -> Vec<String> {
        Vec::new()
    }

    fn submit_rating(&mut self, _deck: &str, _item_id: &str, _rating: u8) {}
}

/// Local scheduler persisting one record per item in the key-value
/// surface, as `srs.<deck>.<id> = "<interval_days>|<due_date>"`. Intervals
/// double on a good rating and collapse back to one day on a miss.
/// Unparseable records are treated as never-reviewed.
pub struct LocalScheduler<S: KvStore> {
    store: S,
    today: NaiveDate,
}

impl<S: KvStore> LocalScheduler<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            today: chrono::Utc::now().date_naive(),
        }
    }

    #[cfg(test)]
    fn with_today(store: S, today: NaiveDate) -> Self {
        Self { store, today }
    }

    fn record(&self, deck: &str, item_id: &str) -> Option<(u32, NaiveDate)> {
        let raw = self.store.get(&storage_key(deck, item_id))?;
        let (interval, due) = raw.split_once('|')?;
        Some((
            interval.parse().ok()?,
            NaiveDate::parse_from_str(due, "%Y-%m-%d").ok()?,
        ))
    }

    /// An item is due when its stored due date has arrived. Items with no
    /// record yet are not flagged; they surface through normal queue order.
    pub fn is_due(&self, deck: &str, item_id: &str) -> bool {
        match self.record(deck, item_id) {
            Some((_, due)) => due <= self.today,
            None => false,
        }
    }

    pub fn due_among<'a>(&self, deck: &str, ids: impl Iterator<Item = &'a str>) -> Vec<String> {
        ids.filter(|id| self.is_due(deck, id))
            .map(|id| id.to_string())
            .collect()
    }
}

impl<S: KvStore> SchedulingSink for LocalScheduler<S> {
    fn fetch_due_ids(&self, deck: &str) -> Vec<String> {
        let prefix = format!("{KEY_PREFIX}{deck}.");
        self.store
            .keys_with_prefix(&prefix)
            .into_iter()
            .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
            .filter(|id| self.is_due(deck, id))
            .collect()
    }

    fn submit_rating(&mut self, deck: &str, item_id: &str, rating: u8) {
        let interval = match self.record(deck, item_id) {
            _ if rating <= 1 => 1,
            Some((interval, _)) => interval.saturating_mul(2).clamp(1, 365),
            None => 1,
        };
        let due = self.today + chrono::Days::new(interval as u64);
        self.store.set(
            &storage_key(deck, item_id),
            &format!("{interval}|{}", due.format("%Y-%m-%d")),
        );
    }
}

fn storage_key(deck: &str, item_id: &str) -> String {
    format!("{KEY_PREFIX}{deck}.{item_id}")
}
