//! Tokenization, term frequencies and cosine similarity

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Tokens must be longer than this many characters to be kept
pub const MIN_TOKEN_CHARS: usize = 2;

/// Conjunctions, articles and common prepositions
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "nor", "yet", "so", "for", "of", "in",
    "on", "at", "to", "by", "with", "from", "into", "onto", "upon", "about",
    "over", "under", "after", "before", "between", "through", "during", "without",
    "within", "among", "across", "along", "around", "via",
];

pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
}

/// Normalized term frequencies of one token sequence.
///
/// Keys are ordered so that every accumulation over the map happens in the
/// same order, which keeps repeated analyses bit-identical.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermFrequencies {
    frequencies: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordScore {
    pub word: String,
    pub score: f64,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    /// Lower-case, replace anything but letters, digits and whitespace with a
    /// space, split on whitespace, then drop short tokens and stop words.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
            .collect();

        cleaned
            .split_whitespace()
            .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
            .filter(|token| !self.is_stop_word(token))
            .map(str::to_string)
            .collect()
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Cosine similarity of the two texts' term frequencies, as a percentage
    pub fn similarity(&self, text1: &str, text2: &str) -> f64 {
        let tf1 = TermFrequencies::from_tokens(&self.tokenize(text1));
        let tf2 = TermFrequencies::from_tokens(&self.tokenize(text2));
        tf1.cosine_similarity(&tf2)
    }

    /// Tokens present in both texts, scored by the mean of their frequencies.
    /// Ties are broken alphabetically.
    pub fn top_shared_keywords(&self, job_text: &str, resume_text: &str, limit: usize) -> Vec<KeywordScore> {
        let job_tf = TermFrequencies::from_tokens(&self.tokenize(job_text));
        let resume_tf = TermFrequencies::from_tokens(&self.tokenize(resume_text));

        let mut keywords: Vec<KeywordScore> = job_tf
            .iter()
            .filter_map(|(word, job_freq)| {
                resume_tf.get(word).map(|resume_freq| KeywordScore {
                    word: word.to_string(),
                    score: (job_freq + resume_freq) / 2.0,
                })
            })
            .collect();

        keywords.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.word.cmp(&b.word))
        });
        keywords.truncate(limit);
        keywords
    }
}

impl TermFrequencies {
    /// Count each distinct token and divide by the sequence length.
    /// An empty sequence gives an empty map.
    pub fn from_tokens(tokens: &[String]) -> Self {
        if tokens.is_empty() {
            return Self::default();
        }

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for token in tokens {
            *counts.entry(token.clone()).or_insert(0) += 1;
        }

        let total = tokens.len() as f64;
        let frequencies = counts
            .into_iter()
            .map(|(token, count)| (token, count as f64 / total))
            .collect();

        Self { frequencies }
    }

    pub fn get(&self, token: &str) -> Option<f64> {
        self.frequencies.get(token).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.frequencies.iter().map(|(token, freq)| (token.as_str(), *freq))
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Percentage cosine similarity over the union of both vocabularies.
    /// Zero when either side has no tokens.
    pub fn cosine_similarity(&self, other: &TermFrequencies) -> f64 {
        let terms: BTreeSet<&str> = self
            .frequencies
            .keys()
            .chain(other.frequencies.keys())
            .map(String::as_str)
            .collect();

        let mut dot_product = 0.0;
        let mut magnitude1 = 0.0;
        let mut magnitude2 = 0.0;

        for term in terms {
            let freq1 = self.get(term).unwrap_or(0.0);
            let freq2 = other.get(term).unwrap_or(0.0);

            dot_product += freq1 * freq2;
            magnitude1 += freq1 * freq1;
            magnitude2 += freq2 * freq2;
        }

        let magnitude = magnitude1.sqrt() * magnitude2.sqrt();
        if magnitude == 0.0 {
            return 0.0;
        }

        (dot_product / magnitude) * 100.0
    }
}
