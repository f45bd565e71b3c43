use std::cmp::Ordering;

use num::Float;

use super::SparseVec;

impl<N> SparseVec<N>
where
    N: Float,
{
    /// ドット積
    /// Merge-join over both index lists; terms are summed in ascending
    /// index order so `a.dot(b)` and `b.dot(a)` are bit-identical.
    #[inline]
    pub fn dot(&self, other: &Self) -> N {
        debug_assert_eq!(
            self.len(),
            other.len(),
            "Vectors must be of the same length to compute dot product."
        );
        let (a_inds, a_vals) = (self.indices(), self.values());
        let (b_inds, b_vals) = (other.indices(), other.values());
        let mut result = N::zero();
        let mut i = 0;
        let mut j = 0;
        while i < a_inds.len() && j < b_inds.len() {
            match a_inds[i].cmp(&b_inds[j]) {
                Ordering::Equal => {
                    result = result + a_vals[i] * b_vals[j];
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        result
    }

    /// Dot product against a dense slice (e.g. a weight vector)
    #[inline]
    pub fn dot_dense(&self, dense: &[N]) -> N {
        self.iter()
            .filter_map(|(i, v)| dense.get(i).map(|&w| v * w))
            .fold(N::zero(), |acc, x| acc + x)
    }

    #[inline]
    pub fn norm_sq(&self) -> N {
        self.values()
            .iter()
            .fold(N::zero(), |acc, &v| acc + v * v)
    }

    #[inline]
    pub fn norm(&self) -> N {
        self.norm_sq().sqrt()
    }

    /// Scale every entry by the matching dense weight.
    /// Entries whose weight is zero (or missing) are dropped.
    pub fn hadamard_dense(&self, weights: &[N]) -> Self {
        let mut out = SparseVec::with_capacity(self.len(), self.nnz());
        for (i, v) in self.iter() {
            let w = weights.get(i).copied().unwrap_or(N::zero());
            out.raw_push(i as u32, v * w);
        }
        out
    }

    /// L2 正規化
    /// A zero (or non-finite) norm leaves the vector all-zero instead of NaN.
    pub fn l2_normalized(&self) -> Self {
        let norm = self.norm();
        if norm == N::zero() || !norm.is_finite() {
            return SparseVec::zeros(self.len());
        }
        let mut out = SparseVec::with_capacity(self.len(), self.nnz());
        for (i, v) in self.iter() {
            out.raw_push(i as u32, v / norm);
        }
        out
    }

    /// Cosine similarity, 0.0 when either side is all-zero
    #[inline]
    pub fn cosine(&self, other: &Self) -> N {
        let denom = self.norm() * other.norm();
        if denom == N::zero() {
            return N::zero();
        }
        self.dot(other) / denom
    }
}
