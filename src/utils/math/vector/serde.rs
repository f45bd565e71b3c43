use num::Float;
use serde::de::Error as DeError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::SparseVec;

impl<N> Serialize for SparseVec<N>
where
    N: Float + Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // len, nnz, entries の 3 フィールド
        let mut state = serializer.serialize_struct("SparseVec", 3)?;
        state.serialize_field("len", &(self.len as u64))?;
        state.serialize_field("nnz", &(self.nnz() as u64))?;
        let entries: Vec<(u64, N)> = self.iter().map(|(i, v)| (i as u64, v)).collect();
        state.serialize_field("entries", &entries)?;
        state.end()
    }
}

impl<'de, N> Deserialize<'de> for SparseVec<N>
where
    N: Float + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct SparseVecData<N> {
            len: u64,
            nnz: u64,
            entries: Vec<(u64, N)>,
        }

        let data = SparseVecData::<N>::deserialize(deserializer)?;
        if data.nnz as usize != data.entries.len() {
            return Err(DeError::custom("SparseVec: nnz does not match entry count"));
        }
        let len = data.len as usize;
        if len > u32::MAX as usize + 1 {
            return Err(DeError::custom("SparseVec: len exceeds u32 index range"));
        }
        let mut vec = SparseVec::with_capacity(len, data.entries.len());
        let mut prev: Option<u64> = None;
        for (index, value) in data.entries {
            if index >= data.len {
                return Err(DeError::custom("SparseVec: index out of range"));
            }
            if prev.is_some_and(|p| p >= index) {
                return Err(DeError::custom("SparseVec: indices must be strictly ascending"));
            }
            if !value.is_finite() {
                return Err(DeError::custom("SparseVec: non-finite entry"));
            }
            if value == N::zero() {
                return Err(DeError::custom("SparseVec: explicit zero entry"));
            }
            prev = Some(index);
            vec.raw_push(index as u32, value);
        }
        Ok(vec)
    }
}
