//! Synonym expansion for free-text and typeahead words.

use hashbrown::HashMap;

/// Lookup from a word to its synonym group.
#[derive(Debug, Clone, Default)]
pub struct Synonyms {
    groups: Vec<Vec<String>>,
    by_word: HashMap<String, usize>,
}

impl Synonyms {
    /// Build from configured groups. Words are lowercased; a word listed in
    /// several groups belongs to the last one.
    pub fn new(groups: &[Vec<String>]) -> Self {
        let mut synonyms = Self::default();
        for group in groups {
            let words: Vec<String> = group
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect();
            if words.len() < 2 {
                continue;
            }

            let idx = synonyms.groups.len();
            for word in &words {
                synonyms.by_word.insert(word.clone(), idx);
            }
            synonyms.groups.push(words);
        }
        synonyms
    }

    /// The word itself followed by its synonyms.
    pub fn expand(&self, word: &str) -> Vec<String> {
        let word = word.to_lowercase();
        let mut expanded = vec![word.clone()];
        if let Some(&idx) = self.by_word.get(&word) {
            expanded.extend(self.groups[idx].iter().filter(|w| **w != word).cloned());
        }
        expanded
    }
}
