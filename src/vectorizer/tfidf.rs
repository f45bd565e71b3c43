use crate::utils::math::vector::SparseVec;
use crate::vectorizer::{corpus::Corpus, term::TermFrequency, vocab::Vocabulary};

/// TF-IDF 計算エンジン
///
/// Plug a different weighting into `TFIDFEncoder<E>` by implementing this.
/// Output is weighted before L2 normalization, which the encoder applies.
pub trait TFIDFEngine {
    /// IDF weight per vocabulary index
    /// # Arguments
    /// * `corpus` - statistics of the fitting corpus
    /// * `vocabulary` - frozen term dimension
    fn idf_vec(corpus: &Corpus, vocabulary: &Vocabulary) -> Vec<f64>;
    /// Term weights of one document, dimensioned to the vocabulary.
    /// Terms outside the vocabulary are dropped.
    fn tf_vec(freq: &TermFrequency, vocabulary: &Vocabulary) -> SparseVec<f64>;
}

/// Textbook TF-IDF:
/// - `tf(t, d)` = raw count
/// - `idf(t)` = `ln(N / df(t))`, natural log, no smoothing
///
/// A term absent from the fitting corpus (`df = 0`) gets idf 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl DefaultTFIDFEngine {
    pub fn new() -> Self {
        DefaultTFIDFEngine
    }

    #[inline]
    pub fn idf(doc_num: u64, doc_freq: u64) -> f64 {
        if doc_num == 0 || doc_freq == 0 {
            return 0.0;
        }
        (doc_num as f64 / doc_freq as f64).ln()
    }
}

impl TFIDFEngine for DefaultTFIDFEngine {
    fn idf_vec(corpus: &Corpus, vocabulary: &Vocabulary) -> Vec<f64> {
        let doc_num = corpus.doc_num();
        vocabulary
            .iter()
            .map(|(_, term)| Self::idf(doc_num, corpus.doc_freq(term)))
            .collect()
    }

    fn tf_vec(freq: &TermFrequency, vocabulary: &Vocabulary) -> SparseVec<f64> {
        let mut inds = Vec::with_capacity(freq.term_num());
        let mut vals = Vec::with_capacity(freq.term_num());
        for (term, count) in freq.iter() {
            if let Some(idx) = vocabulary.index_of(term) {
                inds.push(idx as u32);
                vals.push(count as f64);
            }
        }
        // first-seen order -> index order
        SparseVec::from_unsorted(vocabulary.len(), inds, vals)
    }
}
