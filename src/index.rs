use crate::document::DocId;
use serde::Serialize;
use std::collections::HashMap;

/// Inverted index: token -> posting list of document IDs
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    index: HashMap<String, Vec<DocId>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `doc_id` to the posting list of `token`.
    ///
    /// Only the last entry is checked for a duplicate, so every token of a
    /// document must be added before the next document starts for a posting
    /// list to hold each id at most once.
    pub fn add_posting(&mut self, token: &str, doc_id: DocId) {
        let ids = self.index.entry(token.to_string()).or_default();
        if ids.last() != Some(&doc_id) {
            ids.push(doc_id);
        }
    }

    /// Posting list for a token, in insertion order
    pub fn lookup(&self, token: &str) -> Option<&[DocId]> {
        self.index.get(token).map(Vec::as_slice)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// Number of distinct tokens
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        let total_postings: usize = self.index.values().map(Vec::len).sum();
        IndexStats {
            total_tokens: self.index.len(),
            total_postings,
            avg_docs_per_token: if self.index.is_empty() {
                0.0
            } else {
                total_postings as f64 / self.index.len() as f64
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    pub total_tokens: usize,
    pub total_postings: usize,
    pub avg_docs_per_token: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_lookup() {
        let mut index = InvertedIndex::new();
        index.add_posting("cat", 1);
        index.add_posting("cat", 3);
        index.add_posting("dog", 2);

        assert_eq!(index.lookup("cat"), Some(&[1, 3][..]));
        assert_eq!(index.lookup("dog"), Some(&[2][..]));
        assert_eq!(index.lookup("bird"), None);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_immediate_repeat_suppressed() {
        let mut index = InvertedIndex::new();
        index.add_posting("cat", 5);
        index.add_posting("cat", 5);
        index.add_posting("cat", 5);
        assert_eq!(index.lookup("cat"), Some(&[5][..]));
    }

    #[test]
    fn test_only_last_entry_is_checked() {
        let mut index = InvertedIndex::new();
        index.add_posting("cat", 1);
        index.add_posting("cat", 2);
        index.add_posting("cat", 1);
        assert_eq!(index.lookup("cat"), Some(&[1, 2, 1][..]));
    }

    #[test]
    fn test_insertion_order_not_numeric() {
        let mut index = InvertedIndex::new();
        index.add_posting("cat", 9);
        index.add_posting("cat", 4);
        assert_eq!(index.lookup("cat"), Some(&[9, 4][..]));
    }

    #[test]
    fn test_stats() {
        let mut index = InvertedIndex::new();
        assert_eq!(index.stats().avg_docs_per_token, 0.0);

        index.add_posting("cat", 1);
        index.add_posting("cat", 2);
        index.add_posting("dog", 2);

        let stats = index.stats();
        assert_eq!(stats.total_tokens, 2);
        assert_eq!(stats.total_postings, 3);
        assert_eq!(stats.avg_docs_per_token, 1.5);
    }
}
