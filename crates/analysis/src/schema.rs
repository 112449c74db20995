use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overall {
    Positive,
    Negative,
    Neutral,
}

/// Calibrated two-class sentiment probabilities for a text span.
///
/// `negative + positive` sums to 1.0 (softmax output), except in the
/// fallback case where both are exactly 0.5 and `overall` is neutral.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentResult {
    pub negative: f64,
    pub positive: f64,
    pub overall: Overall,
}

impl SentimentResult {
    /// Neutral default substituted when inference fails.
    pub fn fallback() -> Self {
        Self {
            negative: 0.5,
            positive: 0.5,
            overall: Overall::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasType {
    LeftLeaning,
    RightLeaning,
    Neutral,
    Unknown,
}

/// Keyword-based political-leaning classification and propaganda density.
///
/// `propaganda_score` is phrase matches per word and is deliberately not
/// capped: a very short text with several matches can score above 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiasResult {
    pub bias_type: BiasType,
    pub bias_score: f64,
    pub propaganda_score: f64,
    pub left_keywords: usize,
    pub right_keywords: usize,
    pub propaganda_keywords: usize,
}

impl BiasResult {
    /// Zeroed default substituted when scoring fails.
    pub fn unknown() -> Self {
        Self {
            bias_type: BiasType::Unknown,
            bias_score: 0.0,
            propaganda_score: 0.0,
            left_keywords: 0,
            right_keywords: 0,
            propaganda_keywords: 0,
        }
    }
}

/// One immutable per-article analysis record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleAnalysis {
    pub sentiment: SentimentResult,
    pub bias: BiasResult,
    /// ISO-8601 wall-clock time the analysis ran (not article publish time).
    pub analyzed_at: String,
}

/// Round to `digits` decimal places, matching the public JSON precision.
pub(crate) fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}
