//! Heuristic detection of messages that ask for current information.
//!
//! This is a plain keyword scan followed by an ordered list of extraction patterns.
//! It over-triggers on words like "today" and falls back to the whole message as the
//! query when nothing narrower matches; callers should treat it as a hint only.
use lazy_static::lazy_static;
use regex::Regex;

const SEARCH_KEYWORDS: &[&str] = &[
    "search for",
    "search",
    "find",
    "look up",
    "lookup",
    "google",
    "what is the latest",
    "current",
    "recent",
    "trending",
    "news about",
    "real-time",
    "realtime",
    "right now",
    "today",
    "this week",
    "viral",
    "trending topics",
    "latest trends",
];

lazy_static! {
    static ref QUERY_PATTERNS: Vec<Regex> = [
        r"(?i)search for (.+)",
        r"(?i)search (.+)",
        r"(?i)find (.+)",
        r"(?i)look up (.+)",
        r"(?i)lookup (.+)",
        r"(?i)what is the latest (.+)",
        r"(?i)latest (.+)",
        r"(?i)trending (.+)",
        r"(?i)news about (.+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("search query pattern must compile"))
    .collect();
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchIntent {
    pub needs_search: bool,
    pub query: String,
}

/// Decide whether `message` should trigger a web search, and what to search for
pub fn detect_search_intent(message: &str) -> SearchIntent {
    let lower = message.to_lowercase();
    if !SEARCH_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        return SearchIntent::default();
    }

    let query = QUERY_PATTERNS
        .iter()
        .find_map(|pattern| {
            pattern
                .captures(message)
                .and_then(|captures| captures.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
        .unwrap_or_else(|| message.to_string());

    SearchIntent {
        needs_search: true,
        query,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_for_extracts_query() {
        let intent = detect_search_intent("search for AI trends");
        assert!(intent.needs_search);
        assert_eq!(intent.query, "AI trends");
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let intent = detect_search_intent("Please Look Up  rust async runtimes ");
        assert!(intent.needs_search);
        assert_eq!(intent.query, "rust async runtimes");
    }

    #[test]
    fn test_first_pattern_wins() {
        // "search for" is tried before "latest"
        let intent = detect_search_intent("search for the latest memecoins");
        assert_eq!(intent.query, "the latest memecoins");
    }

    #[test]
    fn test_keyword_without_pattern_falls_back_to_message() {
        let message = "What should I post today?";
        let intent = detect_search_intent(message);
        assert!(intent.needs_search);
        assert_eq!(intent.query, message);
    }

    #[test]
    fn test_no_keyword_no_search() {
        let intent = detect_search_intent("Write a haiku about bananas");
        assert_eq!(intent, SearchIntent::default());
        assert!(intent.query.is_empty());
    }

    #[test]
    fn test_substring_keywords_over_trigger() {
        // "research" contains "search"; kept as a known limitation
        let intent = detect_search_intent("I did some research on my brand");
        assert!(intent.needs_search);
        assert_eq!(intent.query, "on my brand");
    }

    #[test]
    fn test_pattern_stops_at_newline() {
        let intent = detect_search_intent("find vegan recipes\nand summarize them");
        assert_eq!(intent.query, "vegan recipes");
    }
}
