use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Token-keyed mapping that keeps insertion order and refuses to invent
/// values for tokens it never saw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermMap<V> {
    entries: IndexMap<String, V>,
}

/// Per-document occurrence counts.
pub type TermCounts = TermMap<u32>;
/// Per-document counts divided by the document's token total.
pub type TermFrequency = TermMap<f64>;
/// Number of documents containing each vocabulary token.
pub type InverseDocumentCount = TermMap<u32>;
/// Collection-level weight of each vocabulary token.
pub type InverseDocumentFrequency = TermMap<f64>;
/// Per-document `tf * idf` weights.
pub type TfIdfWeights = TermMap<f64>;

impl<V> Default for TermMap<V> {
    fn default() -> Self {
        Self { entries: IndexMap::new() }
    }
}

impl<V: Copy> TermMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: IndexMap::with_capacity(capacity) }
    }

    /// Fails with [`Error::MissingKey`] when `token` is absent.
    pub fn get(&self, token: &str) -> Result<V> {
        self.entries
            .get(token)
            .copied()
            .ok_or_else(|| Error::missing_key(token))
    }

    pub fn contains_key(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, V)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = V> + '_ {
        self.entries.values().copied()
    }

    pub(crate) fn insert(&mut self, token: String, value: V) {
        self.entries.insert(token, value);
    }

    pub(crate) fn get_mut(&mut self, token: &str) -> Option<&mut V> {
        self.entries.get_mut(token)
    }
}

impl TermMap<u32> {
    /// Sum of all counts, i.e. the document's token total.
    pub fn total(&self) -> u32 {
        self.entries.values().sum()
    }

    pub(crate) fn increment(&mut self, token: &str) {
        match self.get_mut(token) {
            Some(count) => *count += 1,
            None => self.insert(token.to_string(), 1),
        }
    }
}

impl TermMap<f64> {
    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }
}

impl<V> FromIterator<(String, V)> for TermMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

/// Distinct tokens of a collection in first-seen order.
///
/// The position of a token is its column in dense exports, so two runs over
/// the same documents always produce the same column layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    tokens: IndexSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.tokens.get_index_of(token)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get_index(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.iter().map(String::as_str)
    }

    /// Adds every key of `counts` not seen yet, keeping earlier positions.
    pub(crate) fn extend_from<V: Copy>(&mut self, counts: &TermMap<V>) {
        for token in counts.keys() {
            if !self.tokens.contains(token) {
                self.tokens.insert(token.to_string());
            }
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { tokens: iter.into_iter().map(Into::into).collect() }
    }
}
