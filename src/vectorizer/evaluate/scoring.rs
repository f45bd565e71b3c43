use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};

use crate::utils::sort::rank_order;

/// One ranked result: corpus index and score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitEntry {
    pub doc_id: usize,
    pub score: f64,
}

/// Structure to store ranked results
#[derive(Clone, PartialEq, Default)]
pub struct Hits {
    pub list: Vec<HitEntry>,
}

impl Hits {
    pub fn new(list: Vec<HitEntry>) -> Self {
        Hits { list }
    }

    /// Score descending, ties by ascending doc_id.
    /// NaN scores are removed.
    pub fn sort_by_score_desc(&mut self) -> &mut Self {
        self.list.retain(|h| !h.score.is_nan());
        self.list
            .sort_by(|a, b| rank_order((a.doc_id, a.score), (b.doc_id, b.score)));
        self
    }

    /// Keep the first `k` entries
    pub fn truncate(&mut self, k: usize) -> &mut Self {
        self.list.truncate(k);
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HitEntry> {
        self.list.iter()
    }

    pub fn into_vec(self) -> Vec<HitEntry> {
        self.list
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // 1 行 1 件
            writeln!(f, "Hits [")?;
            for hit in &self.list {
                writeln!(f, "    {}: {:.6}", hit.doc_id, hit.score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list()
                .entries(self.list.iter().map(|h| (h.doc_id, h.score)))
                .finish()
        }
    }
}

impl Display for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, hit) in self.list.iter().enumerate() {
            writeln!(f, "{:>3}. doc {:<6} {:.6}", rank + 1, hit.doc_id, hit.score)?;
        }
        Ok(())
    }
}
