//! Bag-of-n-grams featurizer fitted on training text.
//!
//! Word n-grams and character n-grams get separate vocabularies. A feature
//! vector is the concatenation `[word counts | char counts]`, normalized
//! according to [`VectorNorm`]. Terms never seen during fitting are ignored,
//! so the dimension stays fixed after `fit`.

use std::collections::HashMap;
use std::iter;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::TextNormalizer;
use crate::ml::SparseVector;

const TEXT_START: char = '\u{2}';
const TEXT_END: char = '\u{3}';

#[derive(Debug, Error, PartialEq)]
pub enum FeaturizeError {
    #[error("word and character n-grams are both disabled")]
    NoNgrams,
    #[error("training text produced an empty vocabulary")]
    EmptyVocabulary,
}

/// Feature vector scaling applied after counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorNorm {
    None,
    L1,
    L2,
    Infinity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturizerOptions {
    pub lowercase: bool,
    pub keep_punctuation: bool,
    pub keep_numbers: bool,
    pub remove_stop_words: bool,
    /// Longest word n-gram; 0 disables word features.
    pub word_ngram_length: usize,
    /// Emit every word n-gram length from 1 up to `word_ngram_length`.
    pub word_all_lengths: bool,
    /// Longest character n-gram; 0 disables character features.
    pub char_ngram_length: usize,
    pub char_all_lengths: bool,
    /// Cap on vocabulary size per n-gram kind, keeping the most frequent terms.
    pub max_terms: Option<usize>,
    pub norm: VectorNorm,
}

impl Default for FeaturizerOptions {
    fn default() -> Self {
        Self {
            lowercase: true,
            keep_punctuation: true,
            keep_numbers: true,
            remove_stop_words: false,
            word_ngram_length: 2,
            word_all_lengths: true,
            char_ngram_length: 3,
            char_all_lengths: false,
            max_terms: None,
            norm: VectorNorm::L2,
        }
    }
}

impl FeaturizerOptions {
    pub fn validate(&self) -> Result<(), FeaturizeError> {
        if self.word_ngram_length == 0 && self.char_ngram_length == 0 {
            return Err(FeaturizeError::NoNgrams);
        }
        Ok(())
    }

    fn normalizer(&self) -> TextNormalizer {
        TextNormalizer {
            lowercase: self.lowercase,
            keep_punctuation: self.keep_punctuation,
            keep_numbers: self.keep_numbers,
            remove_stop_words: self.remove_stop_words,
        }
    }
}

/// Fitted featurizer: options plus the vocabularies learned from training text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFeaturizer {
    options: FeaturizerOptions,
    word_vocab: Vocabulary,
    char_vocab: Vocabulary,
}

impl TextFeaturizer {
    /// Learn word and character vocabularies from `texts`.
    pub fn fit<'a, I>(options: &FeaturizerOptions, texts: I) -> Result<Self, FeaturizeError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        options.validate()?;
        let normalizer = options.normalizer();
        let mut words = VocabularyBuilder::default();
        let mut chars = VocabularyBuilder::default();
        let mut documents = 0usize;
        for text in texts {
            documents += 1;
            let tokens = normalizer.tokens(text);
            word_ngrams(
                &tokens,
                options.word_ngram_length,
                options.word_all_lengths,
                |term| words.observe(term),
            );
            char_ngrams(
                &tokens.join(" "),
                options.char_ngram_length,
                options.char_all_lengths,
                |term| chars.observe(term),
            );
        }

        let featurizer = Self {
            options: options.clone(),
            word_vocab: words.build(options.max_terms),
            char_vocab: chars.build(options.max_terms),
        };
        if featurizer.dim() == 0 {
            return Err(FeaturizeError::EmptyVocabulary);
        }
        info!(
            "Fitted featurizer on {} documents: {} word n-grams, {} char n-grams",
            documents,
            featurizer.word_vocab.len(),
            featurizer.char_vocab.len()
        );
        Ok(featurizer)
    }

    pub fn options(&self) -> &FeaturizerOptions {
        &self.options
    }

    /// Fixed feature dimension.
    pub fn dim(&self) -> usize {
        self.word_vocab.len() + self.char_vocab.len()
    }

    /// Map text to its normalized n-gram count vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let options = &self.options;
        let tokens = options.normalizer().tokens(text);
        let offset = self.word_vocab.len() as u32;
        let mut pairs = Vec::new();
        word_ngrams(
            &tokens,
            options.word_ngram_length,
            options.word_all_lengths,
            |term| {
                if let Some(idx) = self.word_vocab.get(&term) {
                    pairs.push((idx, 1.0));
                }
            },
        );
        char_ngrams(
            &tokens.join(" "),
            options.char_ngram_length,
            options.char_all_lengths,
            |term| {
                if let Some(idx) = self.char_vocab.get(&term) {
                    pairs.push((offset + idx, 1.0));
                }
            },
        );
        let mut vector = SparseVector::from_pairs(self.dim(), pairs);
        apply_norm(&mut vector, options.norm);
        vector
    }

    /// Human-readable name of a feature index, e.g. `w:good movie` or `c:ood`.
    pub fn feature_name(&self, index: usize) -> Option<String> {
        let words = self.word_vocab.len();
        if index < words {
            self.word_vocab.term(index).map(|term| format!("w:{term}"))
        } else {
            self.char_vocab
                .term(index - words)
                .map(|term| format!("c:{}", term.replace([TEXT_START, TEXT_END], "|")))
        }
    }
}

fn word_ngrams(tokens: &[String], len: usize, all_lengths: bool, mut emit: impl FnMut(String)) {
    if len == 0 {
        return;
    }
    let min = if all_lengths { 1 } else { len };
    for n in min..=len {
        for window in tokens.windows(n) {
            emit(window.join(" "));
        }
    }
}

fn char_ngrams(text: &str, len: usize, all_lengths: bool, mut emit: impl FnMut(String)) {
    if len == 0 {
        return;
    }
    let chars: Vec<char> = iter::once(TEXT_START)
        .chain(text.chars())
        .chain(iter::once(TEXT_END))
        .collect();
    let min = if all_lengths { 1 } else { len };
    for n in min..=len {
        for window in chars.windows(n) {
            emit(window.iter().collect());
        }
    }
}

fn apply_norm(vector: &mut SparseVector, norm: VectorNorm) {
    let magnitude = match norm {
        VectorNorm::None => return,
        VectorNorm::L1 => vector.l1_norm(),
        VectorNorm::L2 => vector.l2_norm(),
        VectorNorm::Infinity => vector.max_abs(),
    };
    if magnitude > 0.0 {
        vector.scale(1.0 / magnitude);
    }
}

/// Term list in index order. Serialized as a plain array; the lookup map is rebuilt on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, u32>,
}

impl Vocabulary {
    fn len(&self) -> usize {
        self.terms.len()
    }

    fn get(&self, term: &str) -> Option<u32> {
        self.index.get(term).copied()
    }

    fn term(&self, idx: usize) -> Option<&str> {
        self.terms.get(idx).map(String::as_str)
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(terms: Vec<String>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx as u32))
            .collect();
        Self { terms, index }
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.terms
    }
}

#[derive(Default)]
struct VocabularyBuilder {
    /// term -> (count, first occurrence)
    seen: HashMap<String, (usize, usize)>,
}

impl VocabularyBuilder {
    fn observe(&mut self, term: String) {
        let next = self.seen.len();
        self.seen.entry(term).or_insert((0, next)).0 += 1;
    }

    fn build(self, max_terms: Option<usize>) -> Vocabulary {
        let mut entries: Vec<(String, usize, usize)> = self
            .seen
            .into_iter()
            .map(|(term, (count, first))| (term, count, first))
            .collect();
        if let Some(max) = max_terms {
            if entries.len() > max {
                entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
                entries.truncate(max);
            }
        }
        entries.sort_by_key(|&(_, _, first)| first);
        Vocabulary::from(
            entries
                .into_iter()
                .map(|(term, _, _)| term)
                .collect::<Vec<_>>(),
        )
    }
}
