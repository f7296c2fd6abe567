//! Keyword and query helpers for the news comparison.

use std::collections::HashMap;

/// News search queries are cut to this many characters.
pub const NEWS_QUERY_MAX_CHARS: usize = 140;

/// Words shorter than this never become topics.
const MIN_TOPIC_CHARS: usize = 4;

const STOP_WORDS: &[&str] = &[
    "about", "after", "again", "also", "because", "been", "before", "being", "between", "both",
    "could", "does", "doing", "down", "during", "each", "from", "further", "have", "having",
    "here", "into", "just", "more", "most", "much", "only", "other", "over", "same", "should",
    "some", "such", "than", "that", "their", "them", "then", "there", "these", "they", "this",
    "those", "through", "under", "until", "very", "were", "what", "when", "where", "which",
    "while", "will", "with", "would", "your", "yours",
];

/// Ordered topic keywords for `text`: most frequent first, ties by first
/// appearance. At most `max` keywords.
pub fn derive_topics(text: &str, max: usize) -> Vec<String> {
    // word -> (count, first position)
    let mut seen: HashMap<String, (usize, usize)> = HashMap::new();
    let words = text
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|w| w.chars().count() >= MIN_TOPIC_CHARS)
        .filter(|w| !w.chars().all(|c| c.is_numeric()))
        .filter(|w| !STOP_WORDS.contains(&w.as_str()));

    for (pos, word) in words.enumerate() {
        seen.entry(word).or_insert((0, pos)).0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> =
        seen.into_iter().map(|(w, (count, pos))| (w, count, pos)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.into_iter().take(max).map(|(w, _, _)| w).collect()
}

/// Search query for the news collaborator: the first 140 characters.
pub fn news_query(text: &str) -> String {
    text.trim().chars().take(NEWS_QUERY_MAX_CHARS).collect::<String>().trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_by_frequency_then_position() {
        let text = "Housing costs rise. Housing policy must address rent, and rent control matters. Costs!";
        let topics = derive_topics(text, 3);
        assert_eq!(topics, ["housing", "costs", "rent"]);
    }

    #[test]
    fn topics_skip_stop_words_short_words_and_numbers() {
        let topics = derive_topics("This is what 2025 will bring: taxes", 10);
        assert_eq!(topics, ["bring", "taxes"]);
    }

    #[test]
    fn topics_respect_cap() {
        assert!(derive_topics("alpha beta gamma delta", 0).is_empty());
        assert_eq!(derive_topics("alpha beta gamma delta", 2).len(), 2);
    }

    #[test]
    fn news_query_truncates_on_char_boundary() {
        let text = "ä".repeat(200);
        let q = news_query(&text);
        assert_eq!(q.chars().count(), NEWS_QUERY_MAX_CHARS);
        assert_eq!(news_query("  short message  "), "short message");
    }
}
