use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::store::schema::{HistoryData, ProfileData};

/// Profile and session-history persistence under the app data dir.
/// Loads degrade to defaults on missing or unparseable files; saves are
/// atomic (tmp + rename).
pub struct DataStore {
    base_dir: PathBuf,
}

impl DataStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocadr");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => T::default(),
            }
        } else {
            T::default()
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        super::write_atomic(&self.file_path(name), &json)
    }

    pub fn load_profile(&self) -> ProfileData {
        let profile: ProfileData = self.load("profile.json");
        if profile.needs_reset() {
            ProfileData::default()
        } else {
            profile
        }
    }

    pub fn save_profile(&self, data: &ProfileData) -> Result<()> {
        self.save("profile.json", data)
    }

    pub fn load_history(&self) -> HistoryData {
        self.load("session_history.json")
    }

    pub fn save_history(&self, data: &HistoryData) -> Result<()> {
        self.save("session_history.json", data)
    }

    pub fn mastery_path(&self) -> PathBuf {
        self.file_path("mastery.json")
    }

    pub fn scheduler_path(&self) -> PathBuf {
        self.file_path("srs.json")
    }

    pub fn events_path(&self) -> PathBuf {
        self.file_path("events.jsonl")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::summary::SessionRecord;

    #[test]
    fn test_profile_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::with_base_dir(dir.path().to_path_buf()).unwrap();

        let mut profile = store.load_profile();
        profile.total_sessions = 7;
        profile.streak_days = 3;
        store.save_profile(&profile).unwrap();

        let loaded = store.load_profile();
        assert_eq!(loaded.total_sessions, 7);
        assert_eq!(loaded.streak_days, 3);
    }

    #[test]
    fn test_history_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::with_base_dir(dir.path().to_path_buf()).unwrap();

        let mut history = store.load_history();
        assert!(history.sessions.is_empty());
        history.sessions.push(SessionRecord {
            deck: "french-core".to_string(),
            mode: "review".to_string(),
            score: 5,
            total: 5,
            submissions: 6,
            duration_secs: 48.2,
            timestamp: chrono::Utc::now(),
            missed: vec!["dog".to_string()],
        });
        store.save_history(&history).unwrap();

        let loaded = store.load_history();
        assert_eq!(loaded.sessions.len(), 1);
        assert_eq!(loaded.sessions[0].score, 5);
    }

    #[test]
    fn test_corrupt_profile_degrades_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        std::fs::write(dir.path().join("profile.json"), "garbage").unwrap();

        let profile = store.load_profile();
        assert_eq!(profile.total_sessions, 0);
    }
}
