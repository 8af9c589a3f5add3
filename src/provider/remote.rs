use crate::provider::deck::DeckProvider;
use crate::provider::{ItemProvider, PracticeItem, ProviderError};

/// Fetch a deck from an HTTP endpoint serving the same JSON format as
/// bundled decks (`<base_url>/decks/<name>.json`).
#[derive(Clone)]
pub struct RemoteProvider {
    base_url: String,
}

impl RemoteProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl ItemProvider for RemoteProvider {
    fn fetch_items(&self, deck: &str) -> Result<Vec<PracticeItem>, ProviderError> {
        let url = format!("{}/decks/{deck}.json", self.base_url);
        let content = fetch_url(&url).ok_or_else(|| ProviderError::Fetch(url.clone()))?;
        DeckProvider::parse_deck(deck, &content)
    }
}

fn fetch_url(url: &str) -> Option<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .ok()?;
    let response = client.get(url).send().ok()?;
    if response.status().is_success() {
        response.text().ok()
    } else {
        None
    }
}
