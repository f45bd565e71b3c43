pub mod math;
pub mod serde;

use std::fmt::{self, Debug};

use num::Float;

use crate::utils::sort::radix_sort_u32_soa;

/// SparseVec は 0 要素を疎とした過疎ベクトルです
///
/// Holds `inds` and `vals` side by side (SoA).
/// Invariants:
/// - `inds` is strictly ascending
/// - every index is `< len`
/// - no stored value is zero
#[derive(Clone, PartialEq)]
pub struct SparseVec<N>
where
    N: Float,
{
    len: usize,
    inds: Vec<u32>,
    vals: Vec<N>,
}

impl<N> SparseVec<N>
where
    N: Float,
{
    /// All-zero vector of dimension `len`
    #[inline]
    pub fn zeros(len: usize) -> Self {
        SparseVec {
            len,
            inds: Vec::new(),
            vals: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(len: usize, cap: usize) -> Self {
        SparseVec {
            len,
            inds: Vec::with_capacity(cap),
            vals: Vec::with_capacity(cap),
        }
    }

    /// Build from unordered `(index, value)` pairs.
    /// Duplicate indices are summed, zeros are dropped and
    /// indices `>= len` are ignored.
    pub fn from_unsorted(len: usize, mut inds: Vec<u32>, mut vals: Vec<N>) -> Self {
        debug_assert_eq!(inds.len(), vals.len());
        radix_sort_u32_soa(&mut inds, &mut vals);
        let mut out = Self::with_capacity(len, inds.len());
        for (idx, val) in inds.into_iter().zip(vals) {
            if idx as usize >= len {
                continue;
            }
            match out.inds.last() {
                Some(&last) if last == idx => {
                    if let Some(v) = out.vals.last_mut() {
                        *v = *v + val;
                    }
                }
                _ => {
                    out.inds.push(idx);
                    out.vals.push(val);
                }
            }
        }
        out.drop_zeros();
        out
    }

    /// Build from a dense slice, keeping only non-zero entries.
    pub fn from_dense(dense: &[N]) -> Self {
        let mut out = Self::with_capacity(dense.len(), 0);
        for (i, &v) in dense.iter().enumerate() {
            if v != N::zero() {
                out.inds.push(i as u32);
                out.vals.push(v);
            }
        }
        out
    }

    /// push a value at a new trailing index; caller keeps order
    #[inline]
    pub(crate) fn raw_push(&mut self, index: u32, value: N) {
        debug_assert!(self.inds.last().map_or(true, |&last| last < index));
        if value != N::zero() {
            self.inds.push(index);
            self.vals.push(value);
        }
    }

    #[inline]
    fn drop_zeros(&mut self) {
        let zero = N::zero();
        if self.vals.iter().all(|&v| v != zero) {
            return;
        }
        let mut w = 0;
        for r in 0..self.inds.len() {
            if self.vals[r] != zero {
                self.inds[w] = self.inds[r];
                self.vals[w] = self.vals[r];
                w += 1;
            }
        }
        self.inds.truncate(w);
        self.vals.truncate(w);
    }

    /// dimension
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// number of non-zero entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    /// true when every entry is zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.inds.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<N> {
        if index >= self.len {
            return None;
        }
        match self.inds.binary_search(&(index as u32)) {
            Ok(pos) => Some(self.vals[pos]),
            Err(_) => Some(N::zero()),
        }
    }

    /// Iterate non-zero entries in ascending index order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (usize, N)> + '_ {
        self.inds
            .iter()
            .zip(self.vals.iter())
            .map(|(&i, &v)| (i as usize, v))
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.inds
    }

    #[inline]
    pub fn values(&self) -> &[N] {
        &self.vals
    }

    pub fn to_dense(&self) -> Vec<N> {
        let mut dense = vec![N::zero(); self.len];
        for (i, v) in self.iter() {
            dense[i] = v;
        }
        dense
    }
}

impl<N> Debug for SparseVec<N>
where
    N: Float + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "SparseVec(len: {}, nnz: {}) [", self.len, self.nnz())?;
            for (i, v) in self.iter() {
                writeln!(f, "    {}: {:?}", i, v)?;
            }
            write!(f, "]")
        } else {
            f.debug_struct("SparseVec")
                .field("len", &self.len)
                .field("entries", &self.iter().collect::<Vec<_>>())
                .finish()
        }
    }
}
