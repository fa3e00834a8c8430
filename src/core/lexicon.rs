// File: src/core/lexicon.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The in-memory unigram/bigram store behind every concrete dictionary
/// source. This is the structure the persister serializes and the reload
/// path repopulates; ranked trie traversal happens in the external search
/// engine, so prefix matching here is a plain scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lexicon {
    /// word -> frequency
    unigrams: HashMap<String, u64>,
    /// previous word -> (next word -> frequency)
    bigrams: HashMap<String, HashMap<String, u64>>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a unigram. O(1) amortized.
    pub fn insert_unigram(&mut self, word: impl Into<String>, frequency: u64) {
        self.unigrams.insert(word.into(), frequency);
    }

    /// Inserts or overwrites a bigram. Both words are stored verbatim; the
    /// unigram entries are independent and not created implicitly.
    pub fn insert_bigram(
        &mut self,
        previous: impl Into<String>,
        next: impl Into<String>,
        frequency: u64,
    ) {
        self.bigrams
            .entry(previous.into())
            .or_default()
            .insert(next.into(), frequency);
    }

    pub fn contains(&self, word: &str) -> bool {
        self.unigrams.contains_key(word)
    }

    pub fn frequency(&self, word: &str) -> Option<u64> {
        self.unigrams.get(word).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.unigrams.is_empty() && self.bigrams.is_empty()
    }

    pub fn unigram_count(&self) -> usize {
        self.unigrams.len()
    }

    /// All unigrams starting with `prefix`, unordered.
    pub fn words_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, u64)> + 'a {
        self.unigrams
            .iter()
            .filter(move |(word, _)| word.starts_with(prefix))
            .map(|(word, &freq)| (word.as_str(), freq))
    }

    /// All recorded successors of `previous`, unordered.
    pub fn successors_of<'a>(
        &'a self,
        previous: &str,
    ) -> impl Iterator<Item = (&'a str, u64)> + 'a {
        self.bigrams
            .get(previous)
            .into_iter()
            .flat_map(|next| next.iter().map(|(word, &freq)| (word.as_str(), freq)))
    }

    pub fn iter_unigrams(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.unigrams.iter().map(|(word, &freq)| (word.as_str(), freq))
    }
}
