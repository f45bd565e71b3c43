//! Versioned CBOR snapshots of fitted state.
//!
//! Every snapshot is an envelope `{ format_version, kind, payload }`. Decoding
//! checks the version and kind before touching the payload, then runs the
//! type's own `validate` so a loaded object is never structurally broken.

use ::serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::vectorizer::{evaluate::similarity::SimilarityIndex, vocab::Vocabulary, EncoderState};

/// Bumped whenever a persisted layout changes
pub const FORMAT_VERSION: u32 = 1;

/// A type that can be written to and read back from a snapshot
pub trait Persist: Serialize + DeserializeOwned {
    /// tag stored in the envelope, checked on load
    const KIND: &'static str;

    /// post-decode consistency check
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct Snapshot<P> {
    format_version: u32,
    kind: String,
    payload: P,
}

/// Encode `value` into a CBOR snapshot
pub fn serialize<T: Persist>(value: &T) -> Result<Vec<u8>> {
    let snapshot = Snapshot {
        format_version: FORMAT_VERSION,
        kind: T::KIND.to_string(),
        payload: value,
    };
    Ok(serde_cbor::to_vec(&snapshot)?)
}

/// Decode a snapshot produced by [`serialize`]
pub fn deserialize<T: Persist>(bytes: &[u8]) -> Result<T> {
    let snapshot: Snapshot<serde_cbor::Value> = serde_cbor::from_slice(bytes)?;
    if snapshot.format_version != FORMAT_VERSION {
        return Err(PipelineError::Serialization(format!(
            "unsupported format version {} (expected {FORMAT_VERSION})",
            snapshot.format_version
        )));
    }
    if snapshot.kind != T::KIND {
        return Err(PipelineError::Serialization(format!(
            "snapshot holds `{}`, expected `{}`",
            snapshot.kind,
            T::KIND
        )));
    }
    let value: T = serde_cbor::value::from_value(snapshot.payload)?;
    value.validate()?;
    Ok(value)
}

impl Persist for Vocabulary {
    const KIND: &'static str = "vocabulary";
}

impl Persist for EncoderState {
    const KIND: &'static str = "encoder";

    fn validate(&self) -> Result<()> {
        EncoderState::validate(self)
    }
}

impl Persist for SimilarityIndex {
    const KIND: &'static str = "similarity_index";

    fn validate(&self) -> Result<()> {
        SimilarityIndex::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VocabularyOptions;
    use crate::vectorizer::evaluate::similarity::SimilarityMode;
    use crate::vectorizer::term::Document;
    use crate::vectorizer::TFIDFEncoder;

    fn fitted() -> (TFIDFEncoder, Vec<crate::vectorizer::DocumentVector>) {
        let docs = vec![
            Document::new(0, ["space", "alien", "ship"]),
            Document::new(1, ["space", "station", "crew"]),
            Document::new(2, ["court", "lawyer", "trial"]),
        ];
        let vocab = Vocabulary::fit(&docs, &VocabularyOptions::new()).unwrap();
        TFIDFEncoder::fit_transform(&docs, vocab).unwrap()
    }

    #[test]
    fn encoder_state_roundtrip() {
        let (encoder, _) = fitted();
        let bytes = serialize(encoder.state()).unwrap();
        let state: EncoderState = deserialize(&bytes).unwrap();
        assert_eq!(&state, encoder.state());
        let rebuilt: TFIDFEncoder = TFIDFEncoder::from_state(state).unwrap();
        let doc = Document::new(7, ["alien", "crew"]);
        assert_eq!(rebuilt.transform(&doc), encoder.transform(&doc));
    }

    #[test]
    fn similarity_index_roundtrip() {
        let (_, vectors) = fitted();
        let index = SimilarityIndex::build(vectors, SimilarityMode::Materialized).unwrap();
        let bytes = serialize(&index).unwrap();
        let back: SimilarityIndex = deserialize(&bytes).unwrap();
        assert_eq!(back, index);
        assert_eq!(back.query(0, 2).unwrap(), index.query(0, 2).unwrap());
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let (encoder, _) = fitted();
        let bytes = serialize(encoder.vocabulary()).unwrap();
        let err = deserialize::<EncoderState>(&bytes).unwrap_err();
        assert!(matches!(err, PipelineError::Serialization(_)));
    }

    #[test]
    fn wrong_version_is_rejected() {
        let snapshot = Snapshot {
            format_version: FORMAT_VERSION + 1,
            kind: Vocabulary::KIND.to_string(),
            payload: Vocabulary::default(),
        };
        let bytes = serde_cbor::to_vec(&snapshot).unwrap();
        let err = deserialize::<Vocabulary>(&bytes).unwrap_err();
        assert!(matches!(err, PipelineError::Serialization(_)));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(deserialize::<Vocabulary>(&[0x00, 0x01, 0x02]).is_err());
    }

    #[test]
    fn similarity_snapshot_with_nan_cell_is_rejected() {
        #[derive(Serialize)]
        struct RawIndex {
            dim: usize,
            vectors: Vec<crate::vectorizer::DocumentVector>,
            matrix: Option<Vec<f64>>,
        }
        let (encoder, vectors) = fitted();
        let n = vectors.len();
        let mut matrix = vec![0.0; n * n];
        matrix[1] = f64::NAN;
        let snapshot = Snapshot {
            format_version: FORMAT_VERSION,
            kind: SimilarityIndex::KIND.to_string(),
            payload: RawIndex {
                dim: encoder.dim(),
                vectors,
                matrix: Some(matrix),
            },
        };
        let bytes = serde_cbor::to_vec(&snapshot).unwrap();
        let err = deserialize::<SimilarityIndex>(&bytes).unwrap_err();
        assert!(matches!(err, PipelineError::Serialization(_)));
    }

    #[test]
    fn encoder_snapshot_with_foreign_doc_num_is_rejected() {
        let (encoder, _) = fitted();
        let mut state = encoder.into_state();
        state.idf.doc_num = 99;
        let bytes = serialize(&state).unwrap();
        assert!(matches!(
            deserialize::<EncoderState>(&bytes),
            Err(PipelineError::Serialization(_))
        ));
    }
}
