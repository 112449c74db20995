use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::schema::{Overall, SentimentResult, round_to};

/// Maximum characters kept before tokenization.
const MAX_CHARS: usize = 512;
/// Maximum tokens fed to the model.
const MAX_TOKENS: usize = 512;

const EMBEDDED_WEIGHTS: &str = include_str!("../assets/sentiment_weights.json");

/// Immutable pretrained two-class model: per-token [negative, positive]
/// logit weights plus a class bias pair. Loaded once at startup and shared.
#[derive(Debug, Clone, Deserialize)]
pub struct SentimentModel {
    bias: [f64; 2],
    vocab: HashMap<String, [f64; 2]>,
}

impl SentimentModel {
    /// Load the built-in pretrained weight table.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_WEIGHTS).context("Failed to load embedded sentiment weights")
    }

    /// Load custom weights from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read weights file {}", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("Failed to load weights from {}", path.display()))
    }

    fn from_json(json: &str) -> Result<Self> {
        let model: SentimentModel =
            serde_json::from_str(json).context("Failed to parse sentiment weights")?;
        model.validate()?;
        Ok(model)
    }

    /// Build a model directly from in-memory parts. Weights are used as-is.
    pub fn from_parts(bias: [f64; 2], vocab: HashMap<String, [f64; 2]>) -> Self {
        Self { bias, vocab }
    }

    fn validate(&self) -> Result<()> {
        if self.vocab.is_empty() {
            anyhow::bail!("sentiment model has an empty vocabulary");
        }
        if !self.bias.iter().all(|w| w.is_finite()) {
            anyhow::bail!("sentiment model bias is not finite");
        }
        for (token, weights) in &self.vocab {
            if !weights.iter().all(|w| w.is_finite()) {
                anyhow::bail!("non-finite weight for token {token:?}");
            }
        }
        Ok(())
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("model produced non-finite logits")]
    NonFiniteLogits,
}

/// Sentiment classifier over an immutable loaded model.
///
/// Pure per call and safe to share across tasks; the only state is the
/// `Arc`'d weight table.
#[derive(Clone)]
pub struct SentimentClassifier {
    model: Arc<SentimentModel>,
}

impl SentimentClassifier {
    pub fn new(model: Arc<SentimentModel>) -> Self {
        Self { model }
    }

    /// Classify a text span. Never fails: any inference error is logged
    /// and mapped to the neutral fallback.
    pub fn classify(&self, text: &str) -> SentimentResult {
        match self.infer(text) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "sentiment inference failed, using neutral fallback");
                SentimentResult::fallback()
            }
        }
    }

    fn infer(&self, text: &str) -> Result<SentimentResult, ClassifyError> {
        let clipped = truncate_chars(text, MAX_CHARS);
        let tokens = tokenize(clipped);

        let [mut neg_logit, mut pos_logit] = self.model.bias;
        for token in &tokens {
            if let Some(weights) = self.model.vocab.get(token.as_str()) {
                neg_logit += weights[0];
                pos_logit += weights[1];
            }
        }

        if !neg_logit.is_finite() || !pos_logit.is_finite() {
            return Err(ClassifyError::NonFiniteLogits);
        }

        // Numerically stable softmax over the two logits
        let max_logit = neg_logit.max(pos_logit);
        let exp_neg = (neg_logit - max_logit).exp();
        let exp_pos = (pos_logit - max_logit).exp();
        let sum = exp_neg + exp_pos;

        let negative = exp_neg / sum;
        let positive = exp_pos / sum;

        // Compare the raw probabilities, then round for output
        let overall = if positive > negative {
            Overall::Positive
        } else {
            Overall::Negative
        };

        Ok(SentimentResult {
            negative: round_to(negative, 4),
            positive: round_to(positive, 4),
            overall,
        })
    }
}

/// Clip to the first `max` characters without splitting a UTF-8 sequence.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .take(MAX_TOKENS)
        .map(|s| s.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> SentimentClassifier {
        SentimentClassifier::new(Arc::new(SentimentModel::embedded().unwrap()))
    }

    #[test]
    fn test_embedded_model_loads() {
        let model = SentimentModel::embedded().unwrap();
        assert!(model.vocab_size() > 50);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let classifier = classifier();
        for text in [
            "",
            "markets rallied after the agreement",
            "war and death and disaster",
            "nothing in the vocabulary here whatsoever",
        ] {
            let result = classifier.classify(text);
            assert!(
                (result.negative + result.positive - 1.0).abs() <= 0.0001,
                "probabilities must sum to 1 for {text:?}"
            );
        }
    }

    #[test]
    fn test_positive_and_negative_texts() {
        let classifier = classifier();

        let result = classifier.classify("Excellent growth and a strong recovery");
        assert_eq!(result.overall, Overall::Positive);
        assert!(result.positive > result.negative);

        let result = classifier.classify("Devastating war, death and disaster strike");
        assert_eq!(result.overall, Overall::Negative);
        assert!(result.negative > result.positive);
    }

    #[test]
    fn test_unknown_tokens_give_even_split() {
        // Zero bias and no vocabulary hits leave both logits at zero
        let result = classifier().classify("zyxwv qqqq pppp");
        assert_eq!(result.negative, 0.5);
        assert_eq!(result.positive, 0.5);
        assert_eq!(result.overall, Overall::Negative);
    }

    #[test]
    fn test_inference_failure_falls_back() {
        let mut vocab = HashMap::new();
        vocab.insert("crisis".to_string(), [f64::NAN, f64::NAN]);
        let model = SentimentModel::from_parts([0.0, 0.0], vocab);
        let classifier = SentimentClassifier::new(Arc::new(model));

        let result = classifier.classify("crisis everywhere");
        assert_eq!(result.negative, 0.5);
        assert_eq!(result.positive, 0.5);
        assert_eq!(result.overall, Overall::Neutral);
    }

    #[test]
    fn test_char_truncation_is_utf8_safe() {
        // 600 multibyte characters; the clip must land on a char boundary
        let text = "é".repeat(600);
        let result = classifier().classify(&text);
        assert!((result.negative + result.positive - 1.0).abs() <= 0.0001);
    }

    #[test]
    fn test_truncation_drops_late_tokens() {
        let classifier = classifier();
        // Push the only sentiment-bearing word past the 512-char clip
        let padding = "x ".repeat(300);
        let text = format!("{padding}devastating disaster");
        let result = classifier.classify(&text);
        assert_eq!(result.negative, 0.5);
        assert_eq!(result.positive, 0.5);
    }

    #[test]
    fn test_empty_vocab_rejected_at_load() {
        assert!(SentimentModel::from_json(r#"{"bias": [0.0, 0.0], "vocab": {}}"#).is_err());
    }

    #[test]
    fn test_non_finite_weight_rejected_at_load() {
        // JSON has no NaN literal, so a malformed file surfaces as a parse error
        let json = r#"{"bias": [0.0, 0.0], "vocab": {"good": ["nan", 1.0]}}"#;
        assert!(SentimentModel::from_json(json).is_err());
    }
}
