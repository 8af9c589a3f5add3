use serde::{Deserialize, Serialize};

use crate::session::summary::SessionRecord;

const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileData {
    pub schema_version: u32,
    pub total_sessions: u32,
    pub total_correct: u32,
    pub streak_days: u32,
    pub best_streak: u32,
    pub last_practice_date: Option<String>,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            total_sessions: 0,
            total_correct: 0,
            streak_days: 0,
            best_streak: 0,
            last_practice_date: None,
        }
    }
}

impl ProfileData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryData {
    pub schema_version: u32,
    pub sessions: Vec<SessionRecord>,
}

impl Default for HistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sessions: Vec::new(),
        }
    }
}
