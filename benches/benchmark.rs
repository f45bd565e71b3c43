use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tfidf_pipeline::{
    Document, SimilarityIndex, SimilarityMode, TFIDFEncoder, Tokenizer, Vocabulary, VocabularyOptions,
};

const WORDS: &[&str] = &[
    "space", "alien", "crew", "galaxy", "love", "paris", "war", "king", "robot", "heist",
    "bank", "ghost", "house", "detective", "murder", "ocean", "island", "dragon", "sword", "school",
    "captain", "music", "band", "road", "family", "secret", "city", "night", "storm", "desert",
];

/// Deterministic synthetic corpus: each document draws from a sliding window of the word list
fn synthetic_texts(n: usize, len: usize) -> Vec<String> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..n)
        .map(|doc| {
            (0..len)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    WORDS[(doc + (state % 8) as usize) % WORDS.len()]
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn pipeline_benchmark(c: &mut Criterion) {
    let texts = synthetic_texts(500, 40);
    let tokenizer = Tokenizer::new();
    let docs: Vec<Document> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| Document::from_text(i, text, &tokenizer))
        .collect();
    let options = VocabularyOptions::new();

    c.bench_function("fit_vocabulary", |b| {
        b.iter(|| Vocabulary::fit(black_box(&docs), &options))
    });

    let vocab = Vocabulary::fit(&docs, &options).expect("valid options");
    c.bench_function("fit_transform", |b| {
        b.iter(|| TFIDFEncoder::<tfidf_pipeline::DefaultTFIDFEngine>::fit_transform(black_box(&docs), vocab.clone()))
    });

    let (_, vectors): (TFIDFEncoder, _) = TFIDFEncoder::fit_transform(&docs, vocab).expect("same corpus");
    c.bench_function("similarity_materialized", |b| {
        b.iter(|| SimilarityIndex::build(black_box(vectors.clone()), SimilarityMode::Materialized))
    });

    let index = SimilarityIndex::build(vectors, SimilarityMode::OnDemand).expect("uniform dimensions");
    c.bench_function("query_on_demand", |b| b.iter(|| index.query(black_box(42), 5)));
}

criterion_group!(benches, pipeline_benchmark);
criterion_main!(benches);
