use thiserror::Error;
use tracing::warn;

use crate::schema::{BiasResult, BiasType, round_to};

// Fixed phrase tables, stored lowercase for case-insensitive matching.
const LEFT_LEANING: &[&str] = &[
    "progressive",
    "liberal",
    "inclusive",
    "diversity",
    "climate crisis",
    "gun control",
    "social justice",
    "activist",
    "campaign",
    "movement",
    "fight for",
];

const RIGHT_LEANING: &[&str] = &[
    "conservative",
    "traditional values",
    "law and order",
    "free market",
    "border security",
    "second amendment",
    "patriot",
    "defense",
    "america first",
    "sovereignty",
];

const PROPAGANDA: &[&str] = &[
    "always",
    "never",
    "everyone knows",
    "obviously",
    "clearly",
    "undoubtedly",
    "everyone agrees",
    "everyone except",
    "shocking truth",
    "they don't want you to know",
];

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("lexical scoring produced a non-finite value")]
    NonFiniteScore,
}

/// Deterministic keyword scorer for political leaning and propaganda
/// language. Matching is substring presence against the lowercased text;
/// each phrase counts at most once per category.
#[derive(Debug, Clone, Default)]
pub struct LexicalBiasScorer;

impl LexicalBiasScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score a text span. Never fails: any scoring error is logged and
    /// mapped to the unknown-bias fallback.
    pub fn score(&self, text: &str) -> BiasResult {
        match self.score_inner(text) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "lexical scoring failed, using unknown fallback");
                BiasResult::unknown()
            }
        }
    }

    fn score_inner(&self, text: &str) -> Result<BiasResult, ScoreError> {
        let lower = text.to_lowercase();

        let left_count = count_matches(&lower, LEFT_LEANING);
        let right_count = count_matches(&lower, RIGHT_LEANING);
        let propaganda_count = count_matches(&lower, PROPAGANDA);

        // Ties (left == right > 0) deliberately resolve to right_leaning;
        // observable output, kept bit-for-bit compatible.
        let (bias_type, bias_score) = if left_count == 0 && right_count == 0 {
            (BiasType::Neutral, 0.0)
        } else if left_count > right_count {
            let score = left_count as f64 / (left_count + right_count) as f64;
            (BiasType::LeftLeaning, round_to(score, 2))
        } else {
            let score = right_count as f64 / (left_count + right_count) as f64;
            (BiasType::RightLeaning, round_to(score, 2))
        };

        // Phrase density per word; not clamped, may exceed 1.0 on very
        // short texts.
        let word_count = text.split_whitespace().count().max(1);
        let propaganda_score = round_to(propaganda_count as f64 / word_count as f64, 4);

        if !bias_score.is_finite() || !propaganda_score.is_finite() {
            return Err(ScoreError::NonFiniteScore);
        }

        Ok(BiasResult {
            bias_type,
            bias_score,
            propaganda_score,
            left_keywords: left_count,
            right_keywords: right_count,
            propaganda_keywords: propaganda_count,
        })
    }
}

fn count_matches(lowered_text: &str, phrases: &[&str]) -> usize {
    phrases
        .iter()
        .filter(|phrase| lowered_text.contains(*phrase))
        .count()
}
