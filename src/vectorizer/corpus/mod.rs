use ahash::RandomState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vectorizer::term::{Document, TermFrequency};

/// Term statistics over a fitting corpus.
/// Keeps the document count and, per term, the number of documents containing it.
/// Terms keep their first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    /// number of documents
    doc_num: u64,
    /// term -> document frequency
    #[serde(with = "indexmap::map::serde_seq")]
    term_counts: IndexMap<Box<str>, u64, RandomState>,
}

impl Corpus {
    /// Create a new instance
    pub fn new() -> Self {
        Self {
            doc_num: 0,
            term_counts: IndexMap::with_hasher(RandomState::new()),
        }
    }

    /// Collect statistics from documents
    pub fn from_documents(documents: &[Document]) -> Self {
        let mut corpus = Self::new();
        for doc in documents {
            corpus.add_doc(&doc.term_frequency());
        }
        corpus
    }

    /// Add one document's distinct terms
    pub fn add_doc(&mut self, freq: &TermFrequency) {
        self.doc_num += 1;
        for term in freq.term_set_iter() {
            if let Some(count) = self.term_counts.get_mut(term) {
                *count += 1;
            } else {
                self.term_counts.insert(term.into(), 1);
            }
        }
    }

    /// Get the number of documents in the corpus
    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Number of documents containing `term`
    #[inline]
    pub fn doc_freq(&self, term: &str) -> u64 {
        self.term_counts.get(term).copied().unwrap_or(0)
    }

    /// Number of distinct terms
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_counts.len()
    }

    /// `(term, document frequency)` in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.term_counts.iter().map(|(t, &c)| (t.as_ref(), c))
    }
}
