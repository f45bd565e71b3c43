use proptest::prelude::*;
use tfidf_pipeline::{
    deserialize, serialize, Document, DocumentVector, EncoderState, SimilarityIndex, SimilarityMode,
    TFIDFEncoder, Vocabulary, VocabularyOptions,
};

const TERMS: [&str; 8] = ["action", "alien", "drama", "hero", "love", "space", "story", "war"];
const UNSEEN: [&str; 3] = ["zebra", "quartz", "nebula"];

/// Documents of 0..8 terms drawn from a small alphabet, so duplicates within
/// a document and empty documents both show up often.
fn corpus() -> impl Strategy<Value = Vec<Document>> {
    prop::collection::vec(prop::collection::vec(prop::sample::select(TERMS.to_vec()), 0..8), 1..12).prop_map(
        |docs| {
            docs.into_iter()
                .enumerate()
                .map(|(id, terms)| Document::new(id, terms))
                .collect()
        },
    )
}

fn fitted(docs: &[Document], max_terms: Option<usize>) -> (TFIDFEncoder, Vec<DocumentVector>) {
    let mut options = VocabularyOptions::new();
    options.max_terms = max_terms;
    let vocab = Vocabulary::fit(docs, &options).unwrap();
    TFIDFEncoder::fit_transform(docs, vocab).unwrap()
}

proptest! {
    /// Fitting twice gives the same term -> index mapping, ordered by df desc then term.
    #[test]
    fn prop_vocabulary_is_deterministic_and_ordered(docs in corpus(), cap in prop::option::of(1_usize..6)) {
        let mut options = VocabularyOptions::new();
        options.max_terms = cap;
        let a = Vocabulary::fit(&docs, &options).unwrap();
        let b = Vocabulary::fit(&docs, &options).unwrap();
        prop_assert_eq!(&a, &b);
        let a_terms: Vec<(usize, &str)> = a.iter().collect();
        let b_terms: Vec<(usize, &str)> = b.iter().collect();
        prop_assert_eq!(a_terms, b_terms);
        if let Some(cap) = cap {
            prop_assert!(a.len() <= cap);
        }
        for i in 1..a.len() {
            let (prev_df, df) = (a.doc_freq(i - 1).unwrap(), a.doc_freq(i).unwrap());
            prop_assert!(prev_df > df || (prev_df == df && a.term(i - 1) < a.term(i)));
        }
    }

    /// Every encoded vector has unit length or is exactly zero, never NaN.
    #[test]
    fn prop_vectors_are_unit_or_zero(docs in corpus(), cap in prop::option::of(1_usize..6)) {
        let (encoder, vectors) = fitted(&docs, cap);
        prop_assert_eq!(vectors.len(), docs.len());
        for v in &vectors {
            prop_assert_eq!(v.len(), encoder.dim());
            prop_assert!(v.values().iter().all(|w| w.is_finite()));
            prop_assert!(v.is_zero() || (v.norm() - 1.0).abs() < 1e-9, "norm {}", v.norm());
        }
    }

    /// A document made only of unseen terms encodes to the zero vector.
    #[test]
    fn prop_unseen_terms_encode_to_zero(
        docs in corpus(),
        query in prop::collection::vec(prop::sample::select(UNSEEN.to_vec()), 0..6)
    ) {
        let (encoder, _) = fitted(&docs, None);
        let v = encoder.transform(&Document::new(docs.len(), query));
        prop_assert!(v.is_zero());
        prop_assert_eq!(v.len(), encoder.dim());
    }

    /// Cells lie in [-1, 1], the matrix is bitwise symmetric, and the diagonal is
    /// 1 for non-zero vectors and 0 for zero vectors.
    #[test]
    fn prop_similarity_is_bounded_and_symmetric(docs in corpus()) {
        let (_, vectors) = fitted(&docs, None);
        let index = SimilarityIndex::build(vectors.clone(), SimilarityMode::Materialized).unwrap();
        let lazy = SimilarityIndex::build(vectors.clone(), SimilarityMode::OnDemand).unwrap();
        for i in 0..index.len() {
            let expected_diag = if vectors[i].is_zero() { 0.0 } else { 1.0 };
            prop_assert_eq!(index.similarity(i, i), Some(expected_diag));
            for j in 0..index.len() {
                let s = index.similarity(i, j).unwrap();
                prop_assert!((-1.0..=1.0).contains(&s));
                prop_assert_eq!(s.to_bits(), index.similarity(j, i).unwrap().to_bits());
                prop_assert_eq!(s.to_bits(), lazy.similarity(i, j).unwrap().to_bits());
            }
        }
    }

    /// A query never returns the queried document and returns min(k, N - 1) hits.
    #[test]
    fn prop_query_excludes_self(docs in corpus(), k in 0_usize..15) {
        let (_, vectors) = fitted(&docs, None);
        let index = SimilarityIndex::build(vectors, SimilarityMode::Materialized).unwrap();
        for i in 0..index.len() {
            let hits = index.query(i, k).unwrap();
            prop_assert_eq!(hits.len(), k.min(index.len() - 1));
            prop_assert!(hits.iter().all(|h| h.doc_id != i));
            let scores: Vec<f64> = hits.iter().map(|h| h.score).collect();
            prop_assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    /// Snapshots decode to values equal to the ones encoded.
    #[test]
    fn prop_snapshots_roundtrip(docs in corpus(), cap in prop::option::of(1_usize..6)) {
        let (encoder, vectors) = fitted(&docs, cap);
        let vocab: Vocabulary = deserialize(&serialize(encoder.vocabulary()).unwrap()).unwrap();
        prop_assert_eq!(&vocab, encoder.vocabulary());
        let state: EncoderState = deserialize(&serialize(encoder.state()).unwrap()).unwrap();
        prop_assert_eq!(&state, encoder.state());
        let index = SimilarityIndex::build(vectors, SimilarityMode::Materialized).unwrap();
        let back: SimilarityIndex = deserialize(&serialize(&index).unwrap()).unwrap();
        prop_assert_eq!(back, index);
    }
}
