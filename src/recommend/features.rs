//! Merges a movie's structured metadata into one bag of tags.
//!
//! Multi-word names ("Science Fiction", "Tom Hanks") are flattened to a single
//! token so a name never collides with a plain word from another field.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Raw metadata for one movie
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieRecord {
    pub id: usize,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub genres: Vec<String>,
    pub keywords: Vec<String>,
    /// billing order
    pub cast: Vec<String>,
    pub director: Option<String>,
}

impl MovieRecord {
    pub fn new(id: usize, title: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = Some(overview.into());
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cast<I, S>(mut self, cast: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cast = cast.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_director(mut self, director: impl Into<String>) -> Self {
        self.director = Some(director.into());
        self
    }
}

/// A movie reduced to its title and whitespace-separated tag text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedItem {
    pub id: usize,
    pub title: String,
    pub tags: String,
}

/// "Science Fiction" -> "ScienceFiction"
#[inline]
pub fn flatten_name(name: &str) -> String {
    name.split_whitespace().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureAssembler {
    /// top-billed cast members kept per movie
    pub cast_limit: usize,
}

impl Default for FeatureAssembler {
    fn default() -> Self {
        Self { cast_limit: 3 }
    }
}

impl FeatureAssembler {
    pub fn new(cast_limit: usize) -> Self {
        Self { cast_limit }
    }

    /// Overview words, then genres, keywords, cast and director as flattened names.
    /// A missing or blank title is `InvalidInput`; a missing overview counts as empty.
    pub fn assemble(&self, record: &MovieRecord) -> Result<TaggedItem> {
        let title = match record.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => {
                return Err(PipelineError::InvalidInput(format!(
                    "movie {} has no title",
                    record.id
                )))
            }
        };

        let mut tags: Vec<String> = record
            .overview
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let names = record
            .genres
            .iter()
            .chain(&record.keywords)
            .chain(record.cast.iter().take(self.cast_limit))
            .chain(record.director.as_ref());
        tags.extend(names.map(|name| flatten_name(name)).filter(|name| !name.is_empty()));

        Ok(TaggedItem {
            id: record.id,
            title,
            tags: tags.join(" "),
        })
    }

    /// Assemble every record, failing on the first invalid one
    pub fn assemble_all(&self, records: &[MovieRecord]) -> Result<Vec<TaggedItem>> {
        records.par_iter().map(|record| self.assemble(record)).collect()
    }
}
