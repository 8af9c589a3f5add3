use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;

/// Persistent key-value surface injected into the mastery store and the
/// local review scheduler. Keys are namespaced by the caller (e.g.
/// `mastery.<answer>`), and a store must tolerate unrelated keys written by
/// other features. `set` is best-effort: persistence failures are swallowed
/// so a full disk never takes down a practice turn.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    /// All keys under a namespace prefix, sorted for deterministic order.
    fn keys_with_prefix(&self, prefix: &str) -> Vec<String>;
}

fn prefix_scan(map: &HashMap<String, String>, prefix: &str) -> Vec<String> {
    let mut keys: Vec<String> = map
        .keys()
        .filter(|key| key.starts_with(prefix))
        .cloned()
        .collect();
    keys.sort();
    keys
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryKvStore {
    map: HashMap<String, String>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
    }

    fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        prefix_scan(&self.map, prefix)
    }
}

/// File-backed store: one JSON object per file, loaded whole on open and
/// rewritten atomically on every `set`. A missing or corrupt file degrades
/// to an empty map rather than an error.
pub struct FileKvStore {
    path: PathBuf,
    map: HashMap<String, String>,
}

impl FileKvStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let map = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => HashMap::new(),
        };
        Ok(Self { path, map })
    }

    fn flush(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.map)?;
        super::write_atomic(&self.path, &json)
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
        let _ = self.flush();
    }

    fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        prefix_scan(&self.map, prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryKvStore::new();
        assert_eq!(store.get("mastery.chat"), None);
        store.set("mastery.chat", "2");
        assert_eq!(store.get("mastery.chat"), Some("2".to_string()));
    }

    #[test]
    fn test_unrelated_keys_survive() {
        let mut store = MemoryKvStore::new();
        store.set("other_feature.setting", "on");
        store.set("mastery.chat", "1");
        store.set("mastery.chat", "2");
        assert_eq!(store.get("other_feature.setting"), Some("on".to_string()));
    }

    #[test]
    fn test_prefix_scan_is_sorted_and_scoped() {
        let mut store = MemoryKvStore::new();
        store.set("srs.d.b", "1|2026-08-30");
        store.set("srs.d.a", "1|2026-08-30");
        store.set("srs.e.a", "1|2026-08-30");
        store.set("mastery.chat", "2");

        assert_eq!(
            store.keys_with_prefix("srs.d."),
            vec!["srs.d.a".to_string(), "srs.d.b".to_string()]
        );
        assert!(store.keys_with_prefix("missing.").is_empty());
    }

    #[test]
    fn test_file_store_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.json");

        let mut store = FileKvStore::open(path.clone()).unwrap();
        store.set("mastery.perro", "3");
        drop(store);

        let reopened = FileKvStore::open(path).unwrap();
        assert_eq!(reopened.get("mastery.perro"), Some("3".to_string()));
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileKvStore::open(path).unwrap();
        assert_eq!(store.get("mastery.chat"), None);
    }
}
