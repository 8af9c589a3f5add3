use std::fs;

use rust_embed::Embed;
use serde::Deserialize;

use crate::provider::{ItemProvider, PracticeItem, ProviderError};

#[derive(Embed)]
#[folder = "assets/decks/"]
struct DeckAssets;

#[derive(Deserialize)]
struct DeckFile {
    #[allow(dead_code)]
    name: String,
    #[allow(dead_code)]
    #[serde(default)]
    language: String,
    items: Vec<PracticeItem>,
}

/// Decks bundled into the binary, with user decks from the data dir taking
/// precedence (same lookup order as themes: user dir first, then embedded).
#[derive(Clone, Default)]
pub struct DeckProvider;

impl DeckProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn available_decks() -> Vec<String> {
        let mut decks: Vec<String> = DeckAssets::iter()
            .filter_map(|f| f.strip_suffix(".json").map(|n| n.to_string()))
            .collect();
        if let Some(data_dir) = dirs::data_dir() {
            let user_dir = data_dir.join("vocadr").join("decks");
            if let Ok(entries) = fs::read_dir(user_dir) {
                for entry in entries.flatten() {
                    let name = entry.file_name().to_string_lossy().to_string();
                    if let Some(stem) = name.strip_suffix(".json") {
                        if !decks.iter().any(|d| d == stem) {
                            decks.push(stem.to_string());
                        }
                    }
                }
            }
        }
        decks.sort();
        decks
    }

    fn read_deck(deck: &str) -> Result<String, ProviderError> {
        let filename = format!("{deck}.json");

        if let Some(data_dir) = dirs::data_dir() {
            let user_path = data_dir.join("vocadr").join("decks").join(&filename);
            if let Ok(content) = fs::read_to_string(&user_path) {
                return Ok(content);
            }
        }

        if let Some(file) = DeckAssets::get(&filename) {
            if let Ok(content) = std::str::from_utf8(file.data.as_ref()) {
                return Ok(content.to_string());
            }
        }

        Err(ProviderError::NotFound(deck.to_string()))
    }

    pub fn parse_deck(deck: &str, content: &str) -> Result<Vec<PracticeItem>, ProviderError> {
        let parsed: DeckFile =
            serde_json::from_str(content).map_err(|source| ProviderError::Parse {
                name: deck.to_string(),
                source,
            })?;
        let items: Vec<PracticeItem> = parsed
            .items
            .into_iter()
            .filter(|item| !item.answer.trim().is_empty())
            .collect();
        if items.is_empty() {
            return Err(ProviderError::Empty(deck.to_string()));
        }
        Ok(items)
    }
}

impl ItemProvider for DeckProvider {
    fn fetch_items(&self, deck: &str) -> Result<Vec<PracticeItem>, ProviderError> {
        let content = Self::read_deck(deck)?;
        Self::parse_deck(deck, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_decks_parse() {
        let provider = DeckProvider::new();
        for deck in ["french-core", "spanish-basics"] {
            let items = provider.fetch_items(deck).unwrap();
            assert!(!items.is_empty(), "deck {deck} is empty");
            assert!(items.iter().all(|i| !i.answer.trim().is_empty()));
        }
    }

    #[test]
    fn test_unknown_deck_is_not_found() {
        let provider = DeckProvider::new();
        assert!(matches!(
            provider.fetch_items("no-such-deck"),
            Err(ProviderError::NotFound(_))
        ));
    }

    #[test]
    fn test_malformed_deck_is_parse_error() {
        assert!(matches!(
            DeckProvider::parse_deck("bad", "{oops"),
            Err(ProviderError::Parse { .. })
        ));
    }

    #[test]
    fn test_deck_with_blank_answers_is_empty() {
        let content = r#"{"name":"t","items":[{"id":"1","prompt":"x","answer":"  "}]}"#;
        assert!(matches!(
            DeckProvider::parse_deck("t", content),
            Err(ProviderError::Empty(_))
        ));
    }
}
