//! Spam filter: tokenizer, TF-IDF encoder and logistic regression wired
//! into one train / classify surface.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classifier::metrics::ClassificationReport;
use crate::classifier::{Label, LogisticRegression, Model};
use crate::config::SpamOptions;
use crate::error::{PipelineError, Result};
use crate::vectorizer::term::Document;
use crate::vectorizer::tokenizer::Tokenizer;
use crate::vectorizer::vocab::Vocabulary;
use crate::vectorizer::{EncoderState, TFIDFEncoder};

/// Prediction for one message
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: Label,
    /// probability of `label`, in [0.5, 1]
    pub confidence: f64,
}

#[derive(Debug, Clone)]
pub struct SpamFilter {
    tokenizer: Tokenizer,
    encoder: TFIDFEncoder,
    model: Model,
}

fn tokenizer_for(options: &SpamOptions) -> Tokenizer {
    Tokenizer::standard(options.strip_punctuation, &options.vocabulary.stop_words, options.stem)
}

impl SpamFilter {
    /// Fit vocabulary, encoder and classifier on labelled messages
    pub fn train<S: AsRef<str>>(messages: &[(S, Label)], options: &SpamOptions) -> Result<Self> {
        options.validate()?;
        if messages.is_empty() {
            return Err(PipelineError::EmptyTrainingSet);
        }
        let tokenizer = tokenizer_for(options);
        let docs: Vec<Document> = messages
            .iter()
            .enumerate()
            .map(|(id, (text, _))| Document::from_text(id, text.as_ref(), &tokenizer))
            .collect();
        let labels: Vec<Label> = messages.iter().map(|(_, label)| *label).collect();

        // stop words were removed by the tokenizer before stemming
        let vocabulary = Vocabulary::fit(&docs, &options.vocabulary.without_stop_words())?;
        let (encoder, vectors) = TFIDFEncoder::fit_transform(&docs, vocabulary)?;
        let model = LogisticRegression::new(options.train.clone()).train(&vectors, &labels)?;
        info!(
            messages = messages.len(),
            dim = encoder.dim(),
            converged = model.converged,
            "trained spam filter"
        );
        Ok(Self {
            tokenizer,
            encoder,
            model,
        })
    }

    /// Reassemble from persisted parts. The model must match the encoder's dimension.
    pub fn from_parts(state: EncoderState, model: Model, options: &SpamOptions) -> Result<Self> {
        let encoder = TFIDFEncoder::from_state(state)?;
        if model.dim() != encoder.dim() {
            return Err(PipelineError::Serialization(format!(
                "model dimension {} does not match vocabulary size {}",
                model.dim(),
                encoder.dim()
            )));
        }
        Ok(Self {
            tokenizer: tokenizer_for(options),
            encoder,
            model,
        })
    }

    pub fn encoder(&self) -> &TFIDFEncoder {
        &self.encoder
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn into_parts(self) -> (EncoderState, Model) {
        (self.encoder.into_state(), self.model)
    }

    /// Probability that `message` is spam
    pub fn spam_probability(&self, message: &str) -> Result<f64> {
        let vector = self.encoder.transform_terms(self.tokenizer.tokenize_str(message));
        self.model.predict_score(&vector)
    }

    pub fn classify(&self, message: &str) -> Result<Classification> {
        let p = self.spam_probability(message)?;
        let classification = if p >= 0.5 {
            Classification {
                label: Label::Spam,
                confidence: p,
            }
        } else {
            Classification {
                label: Label::Ham,
                confidence: 1.0 - p,
            }
        };
        debug!(label = %classification.label, confidence = classification.confidence, "classified message");
        Ok(classification)
    }

    /// Classify a possibly-missing message body; `None` is `InvalidInput`
    pub fn classify_body(&self, message: Option<&str>) -> Result<Classification> {
        match message {
            Some(text) => self.classify(text),
            None => Err(PipelineError::InvalidInput("message body is missing".to_string())),
        }
    }

    /// Score the filter against held-out labelled messages
    pub fn evaluate<S: AsRef<str>>(&self, messages: &[(S, Label)]) -> Result<ClassificationReport> {
        let mut predicted = Vec::with_capacity(messages.len());
        for (text, _) in messages {
            predicted.push(self.classify(text.as_ref())?.label);
        }
        let actual: Vec<Label> = messages.iter().map(|(_, label)| *label).collect();
        ClassificationReport::from_labels(&predicted, &actual)
    }
}
