//! Text utilities for topical overlap and divergence signals.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are", "as",
    "at", "be", "because", "been", "before", "being", "below", "between", "both", "but", "by",
    "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how",
    "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more", "most", "my",
    "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
    "out", "over", "own", "per", "same", "she", "should", "so", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
    "yours",
];

// Grouped thousands ("1,000") first, so the comma does not split the value.
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?").expect("number pattern is valid")
});

/// Lowercased alphanumeric runs of `text`.
pub fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Case-folded words of `text` minus stopwords, one-letter tokens and
/// pure numbers.
pub fn significant_words(text: &str) -> BTreeSet<String> {
    tokens(text)
        .filter(|t| t.chars().count() > 1)
        .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .collect()
}

/// |A ∩ B| / |A ∪ B|, defined as 0 when both sets are empty.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Numeric values mentioned in `text`, normalized so `100` equals `100.0`
/// and `1,000` equals `1000`.
pub fn numbers(text: &str) -> BTreeSet<String> {
    NUMBER
        .find_iter(text)
        .filter_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .map(|n| n.to_string())
        .collect()
}

/// Both texts state numbers and they share none.
pub fn numeric_contradiction(a: &BTreeSet<String>, b: &BTreeSet<String>) -> bool {
    !a.is_empty() && !b.is_empty() && a.is_disjoint(b)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn significant_words_drop_stopwords_numbers_and_case() {
        let words = significant_words("The Rate limit is 100 requests/minute");
        let expected: BTreeSet<String> = ["rate", "limit", "requests", "minute"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(words, expected);
    }

    #[test]
    fn jaccard_of_disjoint_and_identical_sets() {
        let a = significant_words("rate limit");
        let b = significant_words("memory leak");
        assert_eq!(jaccard(&a, &b), 0.0);
        assert_eq!(jaccard(&a, &a), 1.0);
        assert_eq!(jaccard(&BTreeSet::new(), &BTreeSet::new()), 0.0);
    }

    #[test]
    fn jaccard_partial_overlap() {
        let a = significant_words("api rate limit requests");
        let b = significant_words("api rate limit crashes");
        // 3 shared of 5 distinct
        assert!((jaccard(&a, &b) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn numbers_normalize_and_compare() {
        assert_eq!(numbers("100 requests, 100.0 max, 2.5s"), numbers("2.5 and 100"));
        assert!(numeric_contradiction(&numbers("100/minute"), &numbers("50/min")));
        assert!(!numeric_contradiction(&numbers("100/minute"), &numbers("100 or 50")));
        assert!(!numeric_contradiction(&numbers("no numbers"), &numbers("50")));
    }

    #[test]
    fn thousands_separators_do_not_split_numbers() {
        assert_eq!(numbers("holds 1,000 messages"), numbers("holds 1000 messages"));
        assert_eq!(numbers("1,250,000.5 bytes"), numbers("1250000.5"));
        assert!(!numeric_contradiction(&numbers("1,000"), &numbers("1000")));
        // A comma list is still separate values.
        assert_eq!(numbers("retry 3,4 times").len(), 2);
    }
}
