//! Trigram index for typeahead candidate lookup.

use crate::DocId;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// A trigram: 3 consecutive bytes encoded as a u32.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Trigram(pub u32);

impl Trigram {
    /// Create a trigram from three bytes.
    pub fn from_bytes(a: u8, b: u8, c: u8) -> Self {
        Self(((a as u32) << 16) | ((b as u32) << 8) | (c as u32))
    }

    /// Extract trigrams from a string.
    pub fn extract(s: &str) -> Vec<Trigram> {
        let lowered = s.to_lowercase();
        let bytes = lowered.as_bytes();
        if bytes.len() < 3 {
            return Vec::new();
        }

        bytes
            .windows(3)
            .map(|w| Trigram::from_bytes(w[0], w[1], w[2]))
            .collect()
    }
}

/// Trigram inverted index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrigramIndex {
    /// Map from trigram to the documents containing it, in insertion order.
    index: HashMap<Trigram, Vec<DocId>>,
}

impl TrigramIndex {
    /// Create a new empty trigram index.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
        }
    }

    /// Add a document to the index with its trigrams.
    pub fn add(&mut self, doc_id: DocId, text: &str) {
        let mut unique_trigrams = Trigram::extract(text);
        unique_trigrams.sort_unstable();
        unique_trigrams.dedup();

        for trigram in unique_trigrams {
            self.index.entry(trigram).or_default().push(doc_id);
        }
    }

    /// Query the index for documents containing all given trigrams.
    ///
    /// Returns an empty list when `trigrams` is empty; callers handle short
    /// terms with a linear scan instead.
    pub fn query(&self, trigrams: &[Trigram]) -> Vec<DocId> {
        if trigrams.is_empty() {
            return Vec::new();
        }

        // Every trigram must be present; find the smallest posting list
        let mut lists = Vec::with_capacity(trigrams.len());
        for trigram in trigrams {
            match self.index.get(trigram) {
                Some(list) => lists.push(list),
                None => return Vec::new(),
            }
        }
        lists.sort_by_key(|list| list.len());

        let Some((smallest, rest)) = lists.split_first() else {
            return Vec::new();
        };

        // Posting lists are sorted by DocId because documents are added in id order.
        smallest
            .iter()
            .filter(|doc_id| rest.iter().all(|list| list.binary_search(doc_id).is_ok()))
            .copied()
            .collect()
    }

    /// Number of unique trigrams in the index.
    pub fn trigram_count(&self) -> usize {
        self.index.len()
    }
}

impl Default for TrigramIndex {
    fn default() -> Self {
        Self::new()
    }
}
