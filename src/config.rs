//! Tunable options for every pipeline stage.
//!
//! All option structs deserialize with `#[serde(default)]`, so a partial JSON
//! document only overrides the fields it names.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::vectorizer::evaluate::similarity::SimilarityMode;
use crate::vectorizer::stop_words;

/// Vocabulary fitting options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyOptions {
    /// keep at most this many terms, highest document frequency first
    pub max_terms: Option<usize>,
    /// terms excluded unconditionally
    pub stop_words: BTreeSet<String>,
    /// minimum document frequency for a term to be eligible
    pub min_df: u64,
}

impl Default for VocabularyOptions {
    fn default() -> Self {
        Self {
            max_terms: None,
            stop_words: BTreeSet::new(),
            min_df: 1,
        }
    }
}

impl VocabularyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_terms(mut self, max_terms: usize) -> Self {
        self.max_terms = Some(max_terms);
        self
    }

    pub fn with_min_df(mut self, min_df: u64) -> Self {
        self.min_df = min_df;
        self
    }

    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    pub fn with_english_stop_words(self) -> Self {
        self.with_stop_words(stop_words::ENGLISH_STOP_WORDS)
    }

    /// Same options with the stop list cleared, for when the tokenizer
    /// has already removed stop words ahead of stemming
    pub fn without_stop_words(&self) -> Self {
        Self {
            stop_words: BTreeSet::new(),
            ..self.clone()
        }
    }

    #[inline]
    pub fn is_stop_word(&self, term: &str) -> bool {
        self.stop_words.contains(term)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_df == 0 {
            return Err(PipelineError::invalid_option("min_df", "must be at least 1"));
        }
        if self.max_terms == Some(0) {
            return Err(PipelineError::invalid_option("max_terms", "must be positive when set"));
        }
        Ok(())
    }
}

/// Logistic regression training options.
/// Every convergence parameter is explicit; nothing falls back to a hidden default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainOptions {
    /// gradient descent step size
    pub learning_rate: f64,
    /// hard cap on full-batch iterations
    pub max_iter: usize,
    /// stop once every gradient component is below this
    pub tolerance: f64,
    /// L2 penalty on the weights (bias is not penalized)
    pub l2: f64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            learning_rate: 1.0,
            max_iter: 1000,
            tolerance: 1e-6,
            l2: 1e-4,
        }
    }
}

impl TrainOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_l2(mut self, l2: f64) -> Self {
        self.l2 = l2;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(PipelineError::invalid_option("learning_rate", "must be a positive finite number"));
        }
        if self.max_iter == 0 {
            return Err(PipelineError::invalid_option("max_iter", "must be positive"));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(PipelineError::invalid_option("tolerance", "must be a non-negative finite number"));
        }
        if !(self.l2.is_finite() && self.l2 >= 0.0) {
            return Err(PipelineError::invalid_option("l2", "must be a non-negative finite number"));
        }
        Ok(())
    }
}

/// Content-based recommender options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderOptions {
    /// number of titles returned per query
    pub top_k: usize,
    /// number of top-billed cast members kept per movie
    pub cast_limit: usize,
    pub stem: bool,
    pub strip_punctuation: bool,
    pub vocabulary: VocabularyOptions,
    pub similarity: SimilarityMode,
}

impl Default for RecommenderOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            cast_limit: 3,
            stem: true,
            strip_punctuation: true,
            vocabulary: VocabularyOptions::new()
                .with_max_terms(5000)
                .with_english_stop_words(),
            similarity: SimilarityMode::Materialized,
        }
    }
}

impl RecommenderOptions {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(PipelineError::invalid_option("top_k", "must be positive"));
        }
        self.vocabulary.validate()
    }
}

/// Spam filter options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpamOptions {
    pub stem: bool,
    pub strip_punctuation: bool,
    pub vocabulary: VocabularyOptions,
    pub train: TrainOptions,
}

impl Default for SpamOptions {
    fn default() -> Self {
        Self {
            stem: true,
            strip_punctuation: true,
            vocabulary: VocabularyOptions::new().with_english_stop_words(),
            train: TrainOptions::default(),
        }
    }
}

impl SpamOptions {
    pub fn validate(&self) -> Result<()> {
        self.vocabulary.validate()?;
        self.train.validate()
    }
}

/// Hold-out split options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitOptions {
    /// fraction of samples placed in the test side, in (0, 1)
    pub test_ratio: f64,
    /// shuffle seed
    pub seed: u64,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            seed: 42,
        }
    }
}

impl SplitOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(PipelineError::invalid_option("test_ratio", "must be in (0, 1)"));
        }
        Ok(())
    }
}

/// Top-level configuration grouping every stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub recommender: RecommenderOptions,
    pub spam: SpamOptions,
    pub split: SplitOptions,
}

impl PipelineConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.recommender.validate()?;
        self.spam.validate()?;
        self.split.validate()
    }
}
