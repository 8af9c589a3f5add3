use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What survives a completed session into the history file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionRecord {
    pub deck: String,
    pub mode: String,
    pub score: usize,
    pub total: usize,
    pub submissions: usize,
    pub duration_secs: f64,
    pub timestamp: DateTime<Utc>,
    /// Prompts answered incorrectly at least once, in first-miss order.
    pub missed: Vec<String>,
}

impl SessionRecord {
    pub fn accuracy(&self) -> f64 {
        if self.submissions == 0 {
            return 100.0;
        }
        (self.score as f64 / self.submissions as f64 * 100.0).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(score: usize, submissions: usize) -> SessionRecord {
        SessionRecord {
            deck: "french-core".to_string(),
            mode: "review".to_string(),
            score,
            total: score,
            submissions,
            duration_secs: 60.0,
            timestamp: Utc::now(),
            missed: Vec::new(),
        }
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(record(3, 4).accuracy(), 75.0);
        assert_eq!(record(0, 0).accuracy(), 100.0);
    }
}
