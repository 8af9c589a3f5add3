use icu_normalizer::ComposingNormalizerBorrowed;

/// Canonical form used both as the mastery-store key and for answer
/// comparison: trim, strip zero-width characters, NFKC-normalize, then
/// case fold. User input and the target answer go through the same path so
/// "Café " and "café" compare equal.
pub fn answer_key(text: &str) -> String {
    let stripped: String = text
        .trim()
        .chars()
        .filter(|ch| !is_zero_width(*ch))
        .collect();
    let normalized = ComposingNormalizerBorrowed::new_nfkc().normalize(&stripped);
    normalized.chars().flat_map(char::to_lowercase).collect()
}

pub fn answers_match(user_input: &str, target: &str) -> bool {
    answer_key(user_input) == answer_key(target)
}

fn is_zero_width(ch: char) -> bool {
    matches!(ch, '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FEFF}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_case_folds() {
        assert_eq!(answer_key("  Chat \n"), "chat");
        assert!(answers_match("CHAT", "chat"));
    }

    #[test]
    fn test_strips_zero_width() {
        assert_eq!(answer_key("ch\u{200B}at"), "chat");
        assert_eq!(answer_key("\u{FEFF}chat"), "chat");
    }

    #[test]
    fn test_unicode_normalization() {
        // Decomposed e + combining acute vs precomposed é
        assert!(answers_match("cafe\u{0301}", "caf\u{00E9}"));
    }

    #[test]
    fn test_no_partial_credit() {
        assert!(!answers_match("chats", "chat"));
        assert!(!answers_match("", "chat"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(answer_key("   "), "");
        assert!(answers_match("", "  "));
    }
}
