//! Content-based movie recommender.
//!
//! Metadata tags are encoded with TF-IDF and movies are ranked by cosine
//! similarity to the queried title.

pub mod features;

use ahash::RandomState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RecommenderOptions;
use crate::error::{PipelineError, Result};
use crate::recommend::features::{FeatureAssembler, MovieRecord};
use crate::vectorizer::evaluate::similarity::SimilarityIndex;
use crate::vectorizer::term::Document;
use crate::vectorizer::tokenizer::Tokenizer;
use crate::vectorizer::vocab::Vocabulary;
use crate::vectorizer::TFIDFEncoder;

/// Result of a title lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Recommendation {
    /// most similar titles first
    Found(Vec<String>),
    NotFound,
}

impl Recommendation {
    pub fn titles(&self) -> &[String] {
        match self {
            Recommendation::Found(titles) => titles,
            Recommendation::NotFound => &[],
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Recommendation::Found(_))
    }
}

#[derive(Debug, Clone)]
pub struct Recommender {
    titles: Vec<String>,
    /// lowercased title -> corpus position, first occurrence wins
    title_index: IndexMap<String, usize, RandomState>,
    encoder: TFIDFEncoder,
    similarity: SimilarityIndex,
    top_k: usize,
}

impl Recommender {
    /// Assemble tags, fit the encoder and build the similarity index
    pub fn fit(records: &[MovieRecord], options: &RecommenderOptions) -> Result<Self> {
        options.validate()?;
        let items = FeatureAssembler::new(options.cast_limit).assemble_all(records)?;
        let tokenizer = Tokenizer::standard(options.strip_punctuation, &options.vocabulary.stop_words, options.stem);
        let docs: Vec<Document> = items
            .iter()
            .enumerate()
            .map(|(pos, item)| Document::from_text(pos, &item.tags, &tokenizer))
            .collect();

        // stop words were removed by the tokenizer before stemming
        let vocabulary = Vocabulary::fit(&docs, &options.vocabulary.without_stop_words())?;
        let (encoder, vectors) = TFIDFEncoder::fit_transform(&docs, vocabulary)?;
        let similarity = SimilarityIndex::build(vectors, options.similarity)?;

        let mut title_index = IndexMap::with_capacity_and_hasher(items.len(), RandomState::new());
        let titles: Vec<String> = items.into_iter().map(|item| item.title).collect();
        for (pos, title) in titles.iter().enumerate() {
            title_index.entry(title.to_lowercase()).or_insert(pos);
        }
        if title_index.len() < titles.len() {
            debug!(duplicates = titles.len() - title_index.len(), "duplicate titles resolve to first occurrence");
        }
        info!(movies = titles.len(), dim = encoder.dim(), "fitted recommender");

        Ok(Self {
            titles,
            title_index,
            encoder,
            similarity,
            top_k: options.top_k,
        })
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn encoder(&self) -> &TFIDFEncoder {
        &self.encoder
    }

    pub fn similarity(&self) -> &SimilarityIndex {
        &self.similarity
    }

    /// Corpus position of `title`, case-insensitive
    pub fn lookup(&self, title: &str) -> Result<usize> {
        self.title_index
            .get(&title.trim().to_lowercase())
            .copied()
            .ok_or_else(|| PipelineError::NotFound(format!("title `{title}`")))
    }

    /// Up to `top_k` `(title, score)` pairs, most similar first
    pub fn recommend_scored(&self, title: &str) -> Result<Vec<(String, f64)>> {
        let pos = self.lookup(title)?;
        let hits = self.similarity.query(pos, self.top_k)?;
        Ok(hits
            .iter()
            .map(|hit| (self.titles[hit.doc_id].clone(), hit.score))
            .collect())
    }

    /// Up to `top_k` titles most similar to `title`; the title itself is never returned
    pub fn recommend(&self, title: &str) -> Recommendation {
        match self.recommend_scored(title) {
            Ok(scored) => Recommendation::Found(scored.into_iter().map(|(title, _)| title).collect()),
            Err(err) => {
                debug!(%err, "no recommendation");
                Recommendation::NotFound
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::evaluate::similarity::SimilarityMode;

    fn movies() -> Vec<MovieRecord> {
        vec![
            MovieRecord::new(0, "Star Voyage")
                .with_overview("A crew travels through space to save the galaxy")
                .with_genres(["Science Fiction", "Adventure"])
                .with_keywords(["space", "alien"]),
            MovieRecord::new(1, "Galaxy Raiders")
                .with_overview("Space pirates attack an alien galaxy")
                .with_genres(["Science Fiction", "Action"])
                .with_keywords(["space", "pirate"]),
            MovieRecord::new(2, "Paris in Spring")
                .with_overview("Two strangers fall in love in Paris")
                .with_genres(["Romance", "Drama"])
                .with_keywords(["love", "paris"]),
            MovieRecord::new(3, "Star Voyage")
                .with_overview("A remake nobody asked for")
                .with_genres(["Comedy"]),
        ]
    }

    #[test]
    fn similar_movie_ranks_first() {
        let rec = Recommender::fit(&movies(), &RecommenderOptions::default()).unwrap();
        let titles = rec.recommend("Star Voyage");
        assert!(titles.is_found());
        assert_eq!(titles.titles()[0], "Galaxy Raiders");
        assert!(titles.titles().len() <= 3);
    }

    #[test]
    fn lookup_is_case_insensitive_and_first_wins() {
        let rec = Recommender::fit(&movies(), &RecommenderOptions::default()).unwrap();
        assert_eq!(rec.lookup("star voyage").unwrap(), 0);
        assert_eq!(rec.lookup("  GALAXY RAIDERS ").unwrap(), 1);
        assert!(matches!(rec.lookup("Nope"), Err(PipelineError::NotFound(_))));
    }

    #[test]
    fn unknown_title_is_not_found() {
        let rec = Recommender::fit(&movies(), &RecommenderOptions::default()).unwrap();
        assert_eq!(rec.recommend("Nonexistent Movie"), Recommendation::NotFound);
        assert!(rec.recommend("Nonexistent Movie").titles().is_empty());
    }

    #[test]
    fn scores_are_descending_and_exclude_query() {
        let mut options = RecommenderOptions::default();
        options.top_k = 2;
        let rec = Recommender::fit(&movies(), &options).unwrap();
        let scored = rec.recommend_scored("Paris in Spring").unwrap();
        assert_eq!(scored.len(), 2);
        assert!(scored.windows(2).all(|w| w[0].1 >= w[1].1));
        assert!(scored.iter().all(|(t, _)| t != "Paris in Spring"));
    }

    #[test]
    fn on_demand_mode_gives_same_answers() {
        let lazy = RecommenderOptions {
            similarity: SimilarityMode::OnDemand,
            ..RecommenderOptions::default()
        };
        let a = Recommender::fit(&movies(), &RecommenderOptions::default()).unwrap();
        let b = Recommender::fit(&movies(), &lazy).unwrap();
        for title in ["Star Voyage", "Galaxy Raiders", "Paris in Spring"] {
            assert_eq!(a.recommend_scored(title).unwrap(), b.recommend_scored(title).unwrap());
        }
    }

    #[test]
    fn missing_title_fails_fit() {
        let mut records = movies();
        records.push(MovieRecord::default());
        assert!(matches!(
            Recommender::fit(&records, &RecommenderOptions::default()),
            Err(PipelineError::InvalidInput(_))
        ));
    }

    #[test]
    fn stemmed_form_of_stop_word_is_kept() {
        let mut records = movies();
        records.push(MovieRecord::new(4, "Chosen").with_overview("The chosen ones return"));
        let rec = Recommender::fit(&records, &RecommenderOptions::default()).unwrap();
        assert!(rec.encoder().vocabulary().contains("one"));
        assert!(!rec.encoder().vocabulary().contains("the"));
    }
}
