use std::collections::BTreeSet;
use std::fmt::Debug;
use std::sync::Arc;

use crate::error::{PipelineError, Result};

/// A pluggable normalization step applied to each lowercased term.
/// Returning `None` drops the term.
pub trait TermFilter: Debug + Send + Sync {
    fn apply(&self, term: String) -> Option<String>;
}

/// Whitespace tokenizer
///
/// Splits on whitespace, lowercases, then runs each term through the
/// configured `TermFilter` chain in insertion order.
///
/// # Examples
/// ```
/// use tfidf_pipeline::vectorizer::tokenizer::{Tokenizer, StripPunctuation};
/// let tokenizer = Tokenizer::new().with_filter(StripPunctuation);
/// let terms: Vec<String> = tokenizer.tokenize_str("Hello, World!").collect();
/// assert_eq!(terms, vec!["hello", "world"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    filters: Vec<Arc<dyn TermFilter>>,
}

impl Tokenizer {
    /// lowercase + whitespace split only
    pub fn new() -> Self {
        Self { filters: Vec::new() }
    }

    /// Build the chain the pipelines use: punctuation strip, stop words, stemming
    pub fn standard(strip_punctuation: bool, stop_words: &BTreeSet<String>, stem: bool) -> Self {
        let mut tokenizer = Self::new();
        if strip_punctuation {
            tokenizer = tokenizer.with_filter(StripPunctuation);
        }
        if !stop_words.is_empty() {
            tokenizer = tokenizer.with_filter(StopWordFilter::new(stop_words.iter()));
        }
        if stem {
            tokenizer = tokenizer.with_filter(SuffixStemmer);
        }
        tokenizer
    }

    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: TermFilter + 'static,
    {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Tokenize a possibly-missing document body.
    /// A missing body is `InvalidInput`; an empty string yields no terms.
    pub fn tokenize<'a>(&'a self, text: Option<&'a str>) -> Result<impl Iterator<Item = String> + 'a> {
        match text {
            Some(text) => Ok(self.tokenize_str(text)),
            None => Err(PipelineError::InvalidInput("document body is missing".to_string())),
        }
    }

    /// Lazy term sequence for a text
    pub fn tokenize_str<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        text.split_whitespace()
            .map(str::to_lowercase)
            .filter_map(move |term| self.normalize(term))
    }

    #[inline]
    fn normalize(&self, term: String) -> Option<String> {
        let mut term = term;
        for filter in &self.filters {
            term = filter.apply(term)?;
        }
        if term.is_empty() {
            None
        } else {
            Some(term)
        }
    }
}

/// Removes every non-alphanumeric character; terms left empty are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripPunctuation;

impl TermFilter for StripPunctuation {
    fn apply(&self, term: String) -> Option<String> {
        if term.chars().all(char::is_alphanumeric) {
            return Some(term);
        }
        let stripped: String = term.chars().filter(|c| c.is_alphanumeric()).collect();
        if stripped.is_empty() {
            None
        } else {
            Some(stripped)
        }
    }
}

/// Drops terms contained in a stop-word set
#[derive(Debug, Clone, Default)]
pub struct StopWordFilter {
    words: BTreeSet<String>,
}

impl StopWordFilter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }
}

impl TermFilter for StopWordFilter {
    fn apply(&self, term: String) -> Option<String> {
        if self.words.contains(&term) {
            None
        } else {
            Some(term)
        }
    }
}

/// Light suffix stemmer (Porter steps 1a, 1b and 1c).
/// "running" -> "run", "ponies" -> "poni", "jumped" -> "jump"
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixStemmer;

impl SuffixStemmer {
    fn is_vowel(c: char) -> bool {
        matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
    }

    /// number of VC sequences
    fn measure(word: &str) -> usize {
        let mut count = 0;
        let mut prev_is_vowel = false;
        for c in word.chars() {
            let is_vowel = Self::is_vowel(c);
            if !is_vowel && prev_is_vowel {
                count += 1;
            }
            prev_is_vowel = is_vowel;
        }
        count
    }

    fn has_vowel(word: &str) -> bool {
        word.chars().any(Self::is_vowel)
    }

    fn ends_with_double_consonant(word: &str) -> bool {
        let mut rev = word.chars().rev();
        match (rev.next(), rev.next()) {
            (Some(a), Some(b)) => a == b && !Self::is_vowel(a),
            _ => false,
        }
    }

    /// consonant-vowel-consonant ending, last not w/x/y
    fn ends_with_cvc(word: &str) -> bool {
        let mut rev = word.chars().rev();
        match (rev.next(), rev.next(), rev.next()) {
            (Some(c2), Some(v), Some(c1)) => {
                !Self::is_vowel(c2)
                    && Self::is_vowel(v)
                    && !Self::is_vowel(c1)
                    && !matches!(c2, 'w' | 'x' | 'y')
            }
            _ => false,
        }
    }

    pub fn stem(word: &str) -> String {
        if word.chars().count() <= 2 {
            return word.to_string();
        }
        let mut word = word.to_string();

        // Step 1a: plurals
        if let Some(stem) = word.strip_suffix("sses") {
            word = format!("{stem}ss");
        } else if let Some(stem) = word.strip_suffix("ies") {
            word = format!("{stem}i");
        } else if word.ends_with("ss") {
            // keep
        } else if let Some(stem) = word.strip_suffix('s') {
            word = stem.to_string();
        }

        // Step 1b: -eed, -ed, -ing
        let mut trimmed = false;
        if let Some(stem) = word.strip_suffix("eed") {
            if Self::measure(stem) > 0 {
                word = format!("{stem}ee");
            }
        } else if let Some(stem) = word.strip_suffix("ed") {
            if Self::has_vowel(stem) {
                word = stem.to_string();
                trimmed = true;
            }
        } else if let Some(stem) = word.strip_suffix("ing") {
            if Self::has_vowel(stem) {
                word = stem.to_string();
                trimmed = true;
            }
        }
        if trimmed {
            if word.ends_with("at") || word.ends_with("bl") || word.ends_with("iz") {
                word.push('e');
            } else if Self::ends_with_double_consonant(&word)
                && !(word.ends_with('l') || word.ends_with('s') || word.ends_with('z'))
            {
                word.pop();
            } else if Self::measure(&word) == 1 && Self::ends_with_cvc(&word) {
                word.push('e');
            }
        }

        // Step 1c: y -> i
        if let Some(stem) = word.strip_suffix('y') {
            if Self::has_vowel(stem) {
                word = format!("{stem}i");
            }
        }
        word
    }
}

impl TermFilter for SuffixStemmer {
    fn apply(&self, term: String) -> Option<String> {
        Some(Self::stem(&term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_lowercases() {
        let tokenizer = Tokenizer::new();
        let terms: Vec<String> = tokenizer.tokenize_str("  Action HERO\tsave\nworld ").collect();
        assert_eq!(terms, vec!["action", "hero", "save", "world"]);
    }

    #[test]
    fn flattened_names_stay_atomic() {
        let tokenizer = Tokenizer::new().with_filter(StripPunctuation);
        let terms: Vec<String> = tokenizer.tokenize_str("TomHanks ScienceFiction").collect();
        assert_eq!(terms, vec!["tomhanks", "sciencefiction"]);
    }

    #[test]
    fn empty_text_is_empty_sequence() {
        let tokenizer = Tokenizer::new();
        assert_eq!(tokenizer.tokenize(Some("")).unwrap().count(), 0);
        assert_eq!(tokenizer.tokenize_str("   ").count(), 0);
    }

    #[test]
    fn missing_body_is_invalid_input() {
        let tokenizer = Tokenizer::new();
        let err = tokenizer.tokenize(None).err().unwrap();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
    }

    #[test]
    fn strip_punctuation_drops_pure_symbols() {
        let tokenizer = Tokenizer::new().with_filter(StripPunctuation);
        let terms: Vec<String> = tokenizer.tokenize_str("let's meet -- now!").collect();
        assert_eq!(terms, vec!["lets", "meet", "now"]);
    }

    #[test]
    fn standard_chain_removes_stop_words_before_stemming() {
        let stop = crate::vectorizer::stop_words::english();
        let tokenizer = Tokenizer::standard(true, &stop, true);
        assert_eq!(tokenizer.filter_count(), 3);
        let terms: Vec<String> = tokenizer.tokenize_str("This is the winning prizes!").collect();
        assert_eq!(terms, vec!["win", "prize"]);
    }

    #[test]
    fn stemmer_handles_common_suffixes() {
        let cases = [
            ("cats", "cat"),
            ("caresses", "caress"),
            ("ponies", "poni"),
            ("running", "run"),
            ("jumped", "jump"),
            ("agreed", "agree"),
            ("happy", "happi"),
            ("hoped", "hope"),
            ("meeting", "meet"),
            ("sing", "sing"),
            ("class", "class"),
            ("is", "is"),
        ];
        for (input, expected) in cases {
            assert_eq!(SuffixStemmer::stem(input), expected, "stem({input})");
        }
    }
}
