//! TF-IDF text pipeline: tokenizer, vocabulary, TF-IDF encoder, cosine
//! similarity index and a logistic-regression classifier, plus the two
//! applications built from them (a content-based movie recommender and a
//! spam filter).
pub mod classifier;
pub mod config;
pub mod error;
pub mod recommend;
pub mod utils;
pub mod vectorizer;

/// Pipeline Error
/// Every fallible operation returns `Result<T, PipelineError>`.
/// Out-of-vocabulary terms, zero-norm vectors and empty corpora are not errors.
pub use error::{PipelineError, Result};

/// Options for every stage, loadable from partial JSON.
pub use config::{
    PipelineConfig, RecommenderOptions, SpamOptions, SplitOptions, TrainOptions, VocabularyOptions,
};

/// Tokenizer
/// Whitespace split, lowercase, then a chain of `TermFilter` steps
/// (punctuation strip, stop words, suffix stemming).
pub use vectorizer::tokenizer::{TermFilter, Tokenizer};

/// Document and per-document term counts
pub use vectorizer::term::{Document, TermFrequency};

/// Vocabulary
/// Frozen term -> index mapping, ordered by document frequency descending
/// then term ascending. Capped by `max_terms`, filtered by `min_df` and stop words.
pub use vectorizer::vocab::Vocabulary;

/// Corpus statistics: document count and per-term document frequency.
/// Base data for IDF.
pub use vectorizer::corpus::Corpus;

/// TF-IDF Encoder
/// Raw-count TF times `ln(N / df)` IDF, L2-normalized. The weighting is
/// pluggable through `TFIDFEngine`; `DefaultTFIDFEngine` is the textbook form.
pub use vectorizer::{DocumentVector, EncoderState, TFIDFEncoder};
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Similarity Index
/// Exact pairwise cosine similarity, materialized or computed per query.
pub use vectorizer::evaluate::similarity::{SimilarityIndex, SimilarityMode};

/// Ranked results
pub use vectorizer::evaluate::scoring::{HitEntry, Hits};

/// Versioned CBOR snapshots for `Vocabulary`, `EncoderState`,
/// `SimilarityIndex` and `Model`.
pub use vectorizer::serde::{deserialize, serialize, Persist};

/// Linear classifier and its evaluation tools
pub use classifier::metrics::{ClassMetrics, ClassificationReport, ConfusionMatrix};
pub use classifier::spam::{Classification, SpamFilter};
pub use classifier::split::train_test_split;
pub use classifier::{Label, LogisticRegression, Model};

/// Movie recommender
pub use recommend::features::{FeatureAssembler, MovieRecord, TaggedItem};
pub use recommend::{Recommendation, Recommender};

/// Sparse vector storage shared by every stage
pub use utils::math::vector::SparseVec;
