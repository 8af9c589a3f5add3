use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Answered,
    TimedOut,
    Skipped,
    SessionCompleted,
}

#[derive(Clone, Debug, Serialize)]
pub struct PracticeEvent {
    pub session: u64,
    pub item_id: Option<String>,
    pub kind: InteractionKind,
    pub correct: Option<bool>,
    pub at: DateTime<Utc>,
}

impl PracticeEvent {
    pub fn turn(session: u64, item_id: &str, kind: InteractionKind, correct: bool) -> Self {
        Self {
            session,
            item_id: Some(item_id.to_string()),
            kind,
            correct: Some(correct),
            at: Utc::now(),
        }
    }

    pub fn session_completed(session: u64) -> Self {
        Self {
            session,
            item_id: None,
            kind: InteractionKind::SessionCompleted,
            correct: None,
            at: Utc::now(),
        }
    }
}

/// Best-effort event recording. Implementations must not error into the
/// caller or delay a transition; a sink that cannot write simply drops the
/// event.
pub trait AnalyticsSink {
    fn record(&mut self, event: PracticeEvent);
}

#[derive(Default)]
pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
    fn record(&mut self, _event: PracticeEvent) {}
}

/// Appends one JSON line per event to a file in the data dir.
pub struct FileAnalytics {
    path: PathBuf,
}

impl FileAnalytics {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl AnalyticsSink for FileAnalytics {
    fn record(&mut self, event: PracticeEvent) {
        let Ok(line) = serde_json::to_string(&event) else {
            return;
        };
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(file, "{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let mut sink = FileAnalytics::new(path.clone());

        sink.record(PracticeEvent::turn(1, "fr-001", InteractionKind::Answered, true));
        sink.record(PracticeEvent::session_completed(1));

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("\"answered\""));
        assert!(content.contains("\"session_completed\""));
    }

    #[test]
    fn test_unwritable_path_is_silent() {
        let mut sink = FileAnalytics::new(PathBuf::from("/nonexistent-dir/events.jsonl"));
        sink.record(PracticeEvent::session_completed(1));
    }
}
