//! Text helpers shared by the summarizer and the outline

use std::borrow::Cow;

/// Safely truncate a string at a UTF-8 boundary
pub fn safe_truncate(s: &str, max_bytes: usize) -> &str {
    if max_bytes >= s.len() {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Keep at most `max_words` whitespace-delimited words.
///
/// Text within the budget is returned untouched (original spacing and line
/// breaks kept). Longer text is rebuilt from its first `max_words` words
/// joined by single spaces.
pub fn truncate_words(text: &str, max_words: usize) -> Cow<'_, str> {
    if text.split_whitespace().nth(max_words).is_none() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.split_whitespace()
            .take(max_words)
            .collect::<Vec<_>>()
            .join(" "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_truncate_ascii() {
        assert_eq!(safe_truncate("hello", 3), "hel");
        assert_eq!(safe_truncate("hello", 10), "hello");
    }

    #[test]
    fn test_safe_truncate_utf8() {
        // "é" is two bytes
        assert_eq!(safe_truncate("café", 4), "caf");
        assert_eq!(safe_truncate("café", 5), "café");
    }

    #[test]
    fn test_truncate_words_within_budget_is_untouched() {
        let text = "Methods\n  We did   X.\n";
        assert!(matches!(truncate_words(text, 4), Cow::Borrowed(t) if t == text));
        assert!(matches!(truncate_words(text, 100), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_words_over_budget() {
        assert_eq!(truncate_words("a  b\nc\td e", 3), "a b c");
    }

    #[test]
    fn test_truncate_words_1300_budget() {
        let words: Vec<String> = (0..1500).map(|i| format!("w{}", i)).collect();
        let text = words.join("\n");
        let truncated = truncate_words(&text, 1300);
        assert_eq!(truncated.split(' ').count(), 1300);
        assert_eq!(truncated, words[..1300].join(" "));
    }
}
