use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::vectorizer::evaluate::scoring::{HitEntry, Hits};
use crate::vectorizer::DocumentVector;

/// How pairwise similarities are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMode {
    /// Full N×N matrix computed at build time. O(N²) memory.
    #[default]
    Materialized,
    /// Keep only the vectors; each query computes one row in O(N).
    OnDemand,
}

/// Exact cosine-similarity index over a fixed corpus.
///
/// Entry (i, j) is `cos(v_i, v_j)` clamped to [-1, 1]. The diagonal is 1.0
/// for non-zero vectors and 0.0 for all-zero ones, and an all-zero vector
/// scores 0.0 against everything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityIndex {
    dim: usize,
    vectors: Vec<DocumentVector>,
    /// row-major N×N, present in `Materialized` mode
    matrix: Option<Vec<f64>>,
}

impl SimilarityIndex {
    /// Build an index. Every vector must share one dimension.
    pub fn build(vectors: Vec<DocumentVector>, mode: SimilarityMode) -> Result<Self> {
        let dim = vectors.first().map_or(0, |v| v.len());
        if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
            return Err(PipelineError::DimensionMismatch {
                expected: dim,
                actual: bad.len(),
            });
        }
        let mut index = Self {
            dim,
            vectors,
            matrix: None,
        };
        if mode == SimilarityMode::Materialized {
            let norms = index.norms();
            let n = index.len();
            let rows: Vec<Vec<f64>> = (0..n)
                .into_par_iter()
                .map(|i| index.row_with_norms(i, &norms))
                .collect();
            index.matrix = Some(rows.into_iter().flatten().collect());
        }
        debug!(docs = index.len(), dim, ?mode, "built similarity index");
        Ok(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn mode(&self) -> SimilarityMode {
        if self.matrix.is_some() {
            SimilarityMode::Materialized
        } else {
            SimilarityMode::OnDemand
        }
    }

    pub fn vector(&self, doc_id: usize) -> Option<&DocumentVector> {
        self.vectors.get(doc_id)
    }

    fn norms(&self) -> Vec<f64> {
        self.vectors.iter().map(|v| v.norm()).collect()
    }

    #[inline]
    fn cell(&self, i: usize, j: usize, norms: &[f64]) -> f64 {
        if i == j {
            return if self.vectors[i].is_zero() { 0.0 } else { 1.0 };
        }
        let denom = norms[i] * norms[j];
        if denom == 0.0 || !denom.is_finite() {
            return 0.0;
        }
        (self.vectors[i].dot(&self.vectors[j]) / denom).clamp(-1.0, 1.0)
    }

    fn row_with_norms(&self, i: usize, norms: &[f64]) -> Vec<f64> {
        (0..self.len()).map(|j| self.cell(i, j, norms)).collect()
    }

    /// Similarities of `doc_id` against every document, in corpus order
    pub fn row(&self, doc_id: usize) -> Option<Vec<f64>> {
        if doc_id >= self.len() {
            return None;
        }
        let n = self.len();
        match &self.matrix {
            Some(matrix) => Some(matrix[doc_id * n..(doc_id + 1) * n].to_vec()),
            None => Some(self.row_with_norms(doc_id, &self.norms())),
        }
    }

    /// Cosine similarity of two documents
    pub fn similarity(&self, i: usize, j: usize) -> Option<f64> {
        let n = self.len();
        if i >= n || j >= n {
            return None;
        }
        match &self.matrix {
            Some(matrix) => Some(matrix[i * n + j]),
            None => Some(self.cell(i, j, &self.norms())),
        }
    }

    /// Top `k` neighbours of `doc_id`, score descending, ties by ascending index.
    /// `doc_id` itself is never included; `k` is capped at N - 1.
    pub fn query(&self, doc_id: usize, k: usize) -> Result<Hits> {
        let row = self
            .row(doc_id)
            .ok_or_else(|| PipelineError::NotFound(format!("document {doc_id}")))?;
        let mut hits = Hits::new(
            row.into_iter()
                .enumerate()
                .filter(|(j, _)| *j != doc_id)
                .map(|(j, score)| HitEntry { doc_id: j, score })
                .collect(),
        );
        hits.sort_by_score_desc().truncate(k);
        Ok(hits)
    }

    /// Structural checks for a decoded index: uniform dimensions, an N×N
    /// matrix whose cells lie in [-1, 1] (NaN fails), finite vector weights
    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self.vectors.iter().find(|v| v.len() != self.dim) {
            return Err(PipelineError::DimensionMismatch {
                expected: self.dim,
                actual: bad.len(),
            });
        }
        if let Some(matrix) = &self.matrix {
            let n = self.len();
            if matrix.len() != n * n {
                return Err(PipelineError::Serialization(format!(
                    "similarity matrix has {} cells, expected {}",
                    matrix.len(),
                    n * n
                )));
            }
            if let Some(pos) = matrix.iter().position(|s| !(-1.0..=1.0).contains(s)) {
                return Err(PipelineError::Serialization(format!(
                    "similarity cell ({}, {}) is {}, outside [-1, 1]",
                    pos / n,
                    pos % n,
                    matrix[pos]
                )));
            }
        }
        if self.vectors.iter().any(|v| v.values().iter().any(|w| !w.is_finite())) {
            return Err(PipelineError::Serialization("document vector holds a non-finite weight".to_string()));
        }
        Ok(())
    }
}
