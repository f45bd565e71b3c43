use ahash::RandomState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::VocabularyOptions;
use crate::error::{PipelineError, Result};
use crate::vectorizer::corpus::Corpus;
use crate::vectorizer::term::Document;

/// Frozen term -> dense index mapping.
///
/// Index order is fixed at fit time: document frequency descending, then
/// term ascending (byte order). The same corpus and options always produce
/// the same mapping. No terms are added after fitting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "VocabularyData", into = "VocabularyData")]
pub struct Vocabulary {
    /// term -> document frequency, position = index
    terms: IndexMap<Box<str>, u64, RandomState>,
    /// size of the fitting corpus
    doc_num: u64,
}

/// `IndexMap` equality ignores order; index assignment is part of the value.
impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.doc_num == other.doc_num && self.terms.iter().eq(other.terms.iter())
    }
}

#[derive(Serialize, Deserialize)]
struct VocabularyData {
    doc_num: u64,
    entries: Vec<(Box<str>, u64)>,
}

impl From<Vocabulary> for VocabularyData {
    fn from(vocab: Vocabulary) -> Self {
        VocabularyData {
            doc_num: vocab.doc_num,
            entries: vocab.terms.into_iter().collect(),
        }
    }
}

impl TryFrom<VocabularyData> for Vocabulary {
    type Error = PipelineError;

    fn try_from(data: VocabularyData) -> Result<Self> {
        let expected = data.entries.len();
        let mut terms = IndexMap::with_capacity_and_hasher(expected, RandomState::new());
        for (term, df) in data.entries {
            if df > data.doc_num {
                return Err(PipelineError::Serialization(format!(
                    "vocabulary term `{term}` has document frequency {df} above corpus size {}",
                    data.doc_num
                )));
            }
            if terms.insert(term, df).is_some() {
                return Err(PipelineError::Serialization("vocabulary contains duplicate terms".to_string()));
            }
        }
        Ok(Vocabulary {
            terms,
            doc_num: data.doc_num,
        })
    }
}

impl Vocabulary {
    /// Fit a vocabulary over `corpus`.
    /// An empty corpus gives an empty vocabulary.
    pub fn fit(corpus: &[Document], options: &VocabularyOptions) -> Result<Self> {
        options.validate()?;
        let stats = Corpus::from_documents(corpus);
        Ok(Self::from_corpus(&stats, options))
    }

    /// Build from precomputed term statistics; options must already be valid
    pub fn from_corpus(stats: &Corpus, options: &VocabularyOptions) -> Self {
        let mut eligible: Vec<(&str, u64)> = stats
            .iter()
            .filter(|(term, df)| *df >= options.min_df && !options.is_stop_word(term))
            .collect();
        // df 降順、同数なら辞書順
        eligible.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        if let Some(max_terms) = options.max_terms {
            eligible.truncate(max_terms);
        }

        let mut terms = IndexMap::with_capacity_and_hasher(eligible.len(), RandomState::new());
        for (term, df) in eligible {
            terms.insert(Box::from(term), df);
        }
        debug!(
            doc_num = stats.doc_num(),
            candidates = stats.vocab_size(),
            kept = terms.len(),
            "fitted vocabulary"
        );
        Vocabulary {
            terms,
            doc_num: stats.doc_num(),
        }
    }

    /// Index of `term`, `None` when out of vocabulary
    #[inline]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.get_index_of(term)
    }

    /// Term at `index`
    #[inline]
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get_index(index).map(|(t, _)| t.as_ref())
    }

    /// Document frequency recorded at fit time
    #[inline]
    pub fn doc_freq(&self, index: usize) -> Option<u64> {
        self.terms.get_index(index).map(|(_, &df)| df)
    }

    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// size of the corpus the vocabulary was fitted on
    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    /// `(index, term)` in index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.terms.keys().enumerate().map(|(i, t)| (i, t.as_ref()))
    }
}
