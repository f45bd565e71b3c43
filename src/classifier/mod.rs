//! Binary linear classifier over TF-IDF vectors.
//!
//! Logistic regression trained by full-batch gradient descent with an L2
//! penalty on the weights. The fitted `Model` is immutable; retraining
//! produces a new one.

pub mod metrics;
pub mod spam;
pub mod split;

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::TrainOptions;
use crate::error::{PipelineError, Result};
use crate::vectorizer::serde::Persist;
use crate::vectorizer::DocumentVector;

/// Class label. `Spam` is the positive class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Ham = 0,
    Spam = 1,
}

impl Label {
    pub const ALL: [Label; 2] = [Label::Ham, Label::Spam];

    #[inline]
    pub fn as_index(self) -> usize {
        self as usize
    }

    #[inline]
    fn target(self) -> f64 {
        match self {
            Label::Ham => 0.0,
            Label::Spam => 1.0,
        }
    }
}

impl TryFrom<usize> for Label {
    type Error = PipelineError;

    fn try_from(value: usize) -> Result<Self> {
        match value {
            0 => Ok(Label::Ham),
            1 => Ok(Label::Spam),
            other => Err(PipelineError::InvalidLabel(other)),
        }
    }
}

impl FromStr for Label {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ham" => Ok(Label::Ham),
            "spam" => Ok(Label::Spam),
            _ => Err(PipelineError::InvalidInput(format!("unknown label `{s}`"))),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Label::Ham => "ham",
            Label::Spam => "spam",
        })
    }
}

/// Overflow-free logistic function
#[inline]
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Trainer. Holds options only; `train` returns an independent `Model`.
#[derive(Debug, Clone, Default)]
pub struct LogisticRegression {
    options: TrainOptions,
}

impl LogisticRegression {
    pub fn new(options: TrainOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TrainOptions {
        &self.options
    }

    /// Fit weights and bias.
    ///
    /// Every vector must have the same dimension. Stops at `max_iter` or once
    /// every gradient component (bias included) is below `tolerance`.
    pub fn train(&self, vectors: &[DocumentVector], labels: &[Label]) -> Result<Model> {
        self.options.validate()?;
        if vectors.len() != labels.len() {
            return Err(PipelineError::LabelMismatch {
                vectors: vectors.len(),
                labels: labels.len(),
            });
        }
        if vectors.is_empty() {
            return Err(PipelineError::EmptyTrainingSet);
        }
        let dim = vectors[0].len();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
            return Err(PipelineError::DimensionMismatch {
                expected: dim,
                actual: bad.len(),
            });
        }

        let opts = &self.options;
        let n = vectors.len() as f64;
        let mut weights = vec![0.0f64; dim];
        let mut bias = 0.0f64;
        let mut grad_w = vec![0.0f64; dim];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < opts.max_iter {
            iterations += 1;
            // per-sample scores; each is one sequential dot product
            let probs: Vec<f64> = vectors
                .par_iter()
                .map(|v| sigmoid(v.dot_dense(&weights) + bias))
                .collect();

            grad_w.iter_mut().for_each(|g| *g = 0.0);
            let mut grad_b = 0.0;
            for ((v, label), p) in vectors.iter().zip(labels).zip(&probs) {
                let err = p - label.target();
                grad_b += err;
                for (j, x) in v.iter() {
                    grad_w[j] += err * x;
                }
            }
            grad_b /= n;
            let mut max_grad = grad_b.abs();
            for (g, w) in grad_w.iter_mut().zip(&weights) {
                *g = *g / n + opts.l2 * w;
                max_grad = max_grad.max(g.abs());
            }

            bias -= opts.learning_rate * grad_b;
            for (w, g) in weights.iter_mut().zip(&grad_w) {
                *w -= opts.learning_rate * g;
            }

            if iterations % 100 == 0 {
                debug!(iterations, max_grad, "gradient descent progress");
            }
            if max_grad < opts.tolerance {
                converged = true;
                break;
            }
        }

        let model = Model {
            weights,
            bias,
            iterations,
            converged,
        };
        let loss = model.log_loss(vectors, labels)?;
        info!(samples = vectors.len(), dim, iterations, converged, loss, "trained logistic regression");
        Ok(model)
    }
}

/// Fitted linear decision boundary: `p(spam | x) = sigmoid(w . x + b)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub weights: Vec<f64>,
    pub bias: f64,
    /// iterations actually run
    pub iterations: usize,
    /// whether the gradient dropped below tolerance before `max_iter`
    pub converged: bool,
}

impl Model {
    /// input dimension
    #[inline]
    pub fn dim(&self) -> usize {
        self.weights.len()
    }

    fn check_dim(&self, vector: &DocumentVector) -> Result<()> {
        if vector.len() != self.dim() {
            return Err(PipelineError::DimensionMismatch {
                expected: self.dim(),
                actual: vector.len(),
            });
        }
        Ok(())
    }

    /// Probability of `Spam`, in [0, 1]
    pub fn predict_score(&self, vector: &DocumentVector) -> Result<f64> {
        self.check_dim(vector)?;
        Ok(sigmoid(vector.dot_dense(&self.weights) + self.bias))
    }

    /// `Spam` when the score is at least 0.5
    pub fn predict(&self, vector: &DocumentVector) -> Result<Label> {
        let p = self.predict_score(vector)?;
        Ok(if p >= 0.5 { Label::Spam } else { Label::Ham })
    }

    pub fn predict_batch(&self, vectors: &[DocumentVector]) -> Result<Vec<Label>> {
        vectors.par_iter().map(|v| self.predict(v)).collect()
    }

    /// Fraction of `vectors` predicted as their label
    pub fn accuracy(&self, vectors: &[DocumentVector], labels: &[Label]) -> Result<f64> {
        let predicted = self.predict_batch(vectors)?;
        metrics::accuracy(&predicted, labels)
    }

    /// Mean cross-entropy on a labelled set
    pub fn log_loss(&self, vectors: &[DocumentVector], labels: &[Label]) -> Result<f64> {
        if vectors.len() != labels.len() {
            return Err(PipelineError::LabelMismatch {
                vectors: vectors.len(),
                labels: labels.len(),
            });
        }
        if vectors.is_empty() {
            return Ok(0.0);
        }
        let mut total = 0.0;
        for (v, label) in vectors.iter().zip(labels) {
            let p = self.predict_score(v)?.clamp(1e-15, 1.0 - 1e-15);
            total -= match label {
                Label::Spam => p.ln(),
                Label::Ham => (1.0 - p).ln(),
            };
        }
        Ok(total / vectors.len() as f64)
    }
}

impl Persist for Model {
    const KIND: &'static str = "model";

    fn validate(&self) -> Result<()> {
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(PipelineError::Serialization("model contains a non-finite weight".to_string()));
        }
        Ok(())
    }
}
