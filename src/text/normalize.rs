/// Common English function words dropped when stop-word removal is enabled.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "me", "more",
    "most", "my", "myself", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
    "ourselves", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they",
    "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "with", "would", "you",
    "your", "yours", "yourself", "yourselves",
];

/// Character-level cleanup and whitespace tokenization applied before n-gram extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct TextNormalizer {
    pub lowercase: bool,
    pub keep_punctuation: bool,
    pub keep_numbers: bool,
    pub remove_stop_words: bool,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self {
            lowercase: true,
            keep_punctuation: true,
            keep_numbers: true,
            remove_stop_words: false,
        }
    }
}

impl TextNormalizer {
    /// Normalize `text` and split it into tokens.
    ///
    /// Dropped characters become separators, so `"great!movie"` without
    /// punctuation yields `["great", "movie"]`.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let mut cleaned = String::with_capacity(text.len());
        for ch in text.chars() {
            if !self.keeps(ch) {
                cleaned.push(' ');
            } else if self.lowercase {
                cleaned.extend(ch.to_lowercase());
            } else {
                cleaned.push(ch);
            }
        }
        cleaned
            .split_whitespace()
            .filter(|token| !(self.remove_stop_words && is_stop_word(token)))
            .map(str::to_string)
            .collect()
    }

    /// Tokens re-joined with single spaces.
    pub fn normalize(&self, text: &str) -> String {
        self.tokens(text).join(" ")
    }

    fn keeps(&self, ch: char) -> bool {
        if ch.is_alphabetic() || ch.is_whitespace() {
            true
        } else if ch.is_numeric() {
            self.keep_numbers
        } else {
            self.keep_punctuation
        }
    }
}

fn is_stop_word(token: &str) -> bool {
    let lowered = token.to_lowercase();
    ENGLISH_STOP_WORDS.binary_search(&lowered.as_str()).is_ok()
}
