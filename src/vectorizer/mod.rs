pub mod corpus;
pub mod evaluate;
pub mod serde;
pub mod stop_words;
pub mod term;
pub mod tfidf;
pub mod tokenizer;
pub mod vocab;

use std::marker::PhantomData;

use ::serde::{Deserialize, Serialize};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::utils::math::vector::SparseVec;
use crate::vectorizer::{
    corpus::Corpus,
    term::{Document, TermFrequency},
    tfidf::{DefaultTFIDFEngine, TFIDFEngine},
    vocab::Vocabulary,
};

/// L2-normalized TF-IDF vector, dimensioned to the vocabulary
pub type DocumentVector = SparseVec<f64>;

/// IDF table, one weight per vocabulary index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IDFVector {
    /// dense: almost every entry is non-zero
    pub idf_vec: Vec<f64>,
    /// size of the fitting corpus
    pub doc_num: u64,
}

/// Fitted encoder parameters: the frozen vocabulary and its IDF table.
/// Serializable; turn it back into an encoder with `TFIDFEncoder::from_state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderState {
    pub vocabulary: Vocabulary,
    pub idf: IDFVector,
}

impl EncoderState {
    /// IDF length must equal vocabulary size, both must come from the same
    /// corpus, and every weight must be finite and >= 0
    pub fn validate(&self) -> Result<()> {
        if self.idf.doc_num != self.vocabulary.doc_num() {
            return Err(PipelineError::Serialization(format!(
                "idf table was fitted on {} documents but vocabulary on {}",
                self.idf.doc_num,
                self.vocabulary.doc_num()
            )));
        }
        if self.idf.idf_vec.len() != self.vocabulary.len() {
            return Err(PipelineError::Serialization(format!(
                "idf table has {} entries but vocabulary has {} terms",
                self.idf.idf_vec.len(),
                self.vocabulary.len()
            )));
        }
        if self.idf.idf_vec.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(PipelineError::Serialization("idf table contains an invalid weight".to_string()));
        }
        Ok(())
    }
}

/// TF-IDF Encoder
///
/// Fit once against a corpus, then transform any number of documents.
/// Out-of-vocabulary terms are dropped; a document with no vocabulary
/// terms becomes the all-zero vector.
///
/// `E` is the weighting engine, `DefaultTFIDFEngine` by default.
#[derive(Debug, Clone)]
pub struct TFIDFEncoder<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    state: EncoderState,
    _marker: PhantomData<fn() -> E>,
}

impl<E> TFIDFEncoder<E>
where
    E: TFIDFEngine,
{
    /// Fit IDF weights on `corpus` for the given vocabulary.
    /// The vocabulary must have been fitted on a corpus of the same size.
    pub fn fit(corpus: &[Document], vocabulary: Vocabulary) -> Result<Self> {
        let stats = Corpus::from_documents(corpus);
        if stats.doc_num() != vocabulary.doc_num() {
            return Err(PipelineError::InvalidInput(format!(
                "vocabulary was fitted on {} documents, encoder corpus has {}",
                vocabulary.doc_num(),
                stats.doc_num()
            )));
        }
        let idf_vec = E::idf_vec(&stats, &vocabulary);
        debug!(doc_num = stats.doc_num(), dim = vocabulary.len(), "fitted tf-idf encoder");
        Ok(Self {
            state: EncoderState {
                vocabulary,
                idf: IDFVector {
                    idf_vec,
                    doc_num: stats.doc_num(),
                },
            },
            _marker: PhantomData,
        })
    }

    /// Fit then transform the same corpus
    pub fn fit_transform(corpus: &[Document], vocabulary: Vocabulary) -> Result<(Self, Vec<DocumentVector>)> {
        let encoder = Self::fit(corpus, vocabulary)?;
        let vectors = encoder.transform_batch(corpus);
        Ok((encoder, vectors))
    }

    /// Rebuild from persisted parameters
    pub fn from_state(state: EncoderState) -> Result<Self> {
        state.validate()?;
        Ok(Self {
            state,
            _marker: PhantomData,
        })
    }

    pub fn state(&self) -> &EncoderState {
        &self.state
    }

    pub fn into_state(self) -> EncoderState {
        self.state
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.state.vocabulary
    }

    /// vector dimension
    pub fn dim(&self) -> usize {
        self.state.vocabulary.len()
    }

    /// IDF weight of a term, 0.0 when out of vocabulary
    pub fn idf(&self, term: &str) -> f64 {
        self.state
            .vocabulary
            .index_of(term)
            .and_then(|i| self.state.idf.idf_vec.get(i).copied())
            .unwrap_or(0.0)
    }

    pub fn transform(&self, doc: &Document) -> DocumentVector {
        self.transform_freq(&doc.term_frequency())
    }

    pub fn transform_terms<I, S>(&self, terms: I) -> DocumentVector
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let freq: TermFrequency = terms.into_iter().collect();
        self.transform_freq(&freq)
    }

    /// tf * idf, then L2 normalize
    pub fn transform_freq(&self, freq: &TermFrequency) -> DocumentVector {
        let tf = E::tf_vec(freq, &self.state.vocabulary);
        tf.hadamard_dense(&self.state.idf.idf_vec).l2_normalized()
    }

    /// Transform documents in parallel; output order follows input order
    pub fn transform_batch(&self, docs: &[Document]) -> Vec<DocumentVector> {
        docs.par_iter().map(|doc| self.transform(doc)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VocabularyOptions;

    fn movies() -> Vec<Document> {
        vec![
            Document::new(0, ["action", "hero", "save", "world"]),
            Document::new(1, ["action", "hero", "fight", "villain"]),
            Document::new(2, ["romance", "drama", "love", "story"]),
        ]
    }

    fn encoder() -> (TFIDFEncoder, Vec<DocumentVector>) {
        let docs = movies();
        let vocab = Vocabulary::fit(&docs, &VocabularyOptions::new()).unwrap();
        TFIDFEncoder::fit_transform(&docs, vocab).unwrap()
    }

    #[test]
    fn vectors_are_unit_length() {
        let (encoder, vectors) = encoder();
        assert_eq!(vectors.len(), 3);
        for v in &vectors {
            assert_eq!(v.len(), encoder.dim());
            assert!((v.norm() - 1.0).abs() < 1e-12);
            assert!(v.values().iter().all(|w| *w > 0.0));
        }
    }

    #[test]
    fn weights_follow_raw_count_times_ln_idf() {
        let (encoder, _) = encoder();
        let v = encoder.transform_terms(["action", "save", "save"]);
        let a = 1.0 * (3.0f64 / 2.0).ln();
        let s = 2.0 * 3.0f64.ln();
        let norm = (a * a + s * s).sqrt();
        let action = encoder.vocabulary().index_of("action").unwrap();
        let save = encoder.vocabulary().index_of("save").unwrap();
        assert!((v.get(action).unwrap() - a / norm).abs() < 1e-12);
        assert!((v.get(save).unwrap() - s / norm).abs() < 1e-12);
    }

    #[test]
    fn unseen_terms_give_zero_vector() {
        let (encoder, _) = encoder();
        let v = encoder.transform_terms(["spaceship", "alien"]);
        assert!(v.is_zero());
        assert_eq!(v.len(), encoder.dim());
        let empty = encoder.transform(&Document::new(9, Vec::<String>::new()));
        assert!(empty.is_zero());
    }

    #[test]
    fn term_in_every_document_weighs_zero() {
        let docs = vec![Document::new(0, ["same", "x"]), Document::new(1, ["same", "y"])];
        let vocab = Vocabulary::fit(&docs, &VocabularyOptions::new()).unwrap();
        let encoder: TFIDFEncoder = TFIDFEncoder::fit(&docs, vocab).unwrap();
        assert_eq!(encoder.idf("same"), 0.0);
        let v = encoder.transform_terms(["same"]);
        assert!(v.is_zero());
        assert!(v.values().iter().all(|w| !w.is_nan()));
    }

    #[test]
    fn batch_matches_sequential() {
        let (encoder, vectors) = encoder();
        let sequential: Vec<DocumentVector> = movies().iter().map(|d| encoder.transform(d)).collect();
        assert_eq!(vectors, sequential);
    }

    #[test]
    fn state_roundtrip_rebuilds_identical_encoder() {
        let (encoder, _) = encoder();
        let state = encoder.state().clone();
        let rebuilt: TFIDFEncoder = TFIDFEncoder::from_state(state).unwrap();
        let doc = Document::new(0, ["hero", "villain"]);
        assert_eq!(rebuilt.transform(&doc), encoder.transform(&doc));
    }

    #[test]
    fn from_state_rejects_mismatched_idf() {
        let (encoder, _) = encoder();
        let mut state = encoder.into_state();
        state.idf.idf_vec.pop();
        let err = TFIDFEncoder::<DefaultTFIDFEngine>::from_state(state).unwrap_err();
        assert!(matches!(err, PipelineError::Serialization(_)));
    }

    #[test]
    fn from_state_rejects_mismatched_doc_num() {
        let (encoder, _) = encoder();
        let mut state = encoder.into_state();
        state.idf.doc_num += 1;
        let err = TFIDFEncoder::<DefaultTFIDFEngine>::from_state(state).unwrap_err();
        assert!(matches!(err, PipelineError::Serialization(_)));
    }

    #[test]
    fn fit_rejects_vocabulary_from_another_corpus() {
        let docs = movies();
        let vocab = Vocabulary::fit(&docs[..2], &VocabularyOptions::new()).unwrap();
        let err = TFIDFEncoder::<DefaultTFIDFEngine>::fit(&docs, vocab).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
    }
}
