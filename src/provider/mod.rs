pub mod analytics;
pub mod deck;
#[cfg(feature = "network")]
pub mod remote;
pub mod srs;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One practice item: a prompt shown to the learner and the answer they
/// must produce. Items are owned by their provider; sessions only hold
/// clones and never mutate them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeItem {
    pub id: String,
    pub prompt: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("deck '{0}' not found")]
    NotFound(String),
    #[error("deck '{name}' could not be parsed: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("deck '{0}' contains no usable items")]
    Empty(String),
    #[error("deck fetch failed: {0}")]
    Fetch(String),
}

/// Source of practice items for a session. Implementations may block (they
/// run on a background thread; results arrive as an event tagged with the
/// requesting session's generation).
pub trait ItemProvider {
    fn fetch_items(&self, deck: &str) -> Result<Vec<PracticeItem>, ProviderError>;
}
