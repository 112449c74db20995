use std::collections::HashMap;

use analysis::BiasType;
use serde::{Deserialize, Serialize};

use crate::store::StoredArticle;

/// Per-leaning article counts. Records with an `unknown` bias type are
/// not counted here, so these may sum to less than `total_articles`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BiasDistribution {
    pub left_leaning: usize,
    pub right_leaning: usize,
    pub neutral: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvgSentiment {
    pub positive: f64,
    pub negative: f64,
}

/// Corpus-wide statistics, recomputed fresh from the full corpus on every
/// query. No incremental state is kept anywhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusStats {
    pub total_articles: usize,
    pub by_source: HashMap<String, usize>,
    pub bias_distribution: BiasDistribution,
    pub avg_sentiment: AvgSentiment,
}

/// Fold a read-only snapshot of analyzed articles into corpus statistics.
pub fn aggregate(records: &[StoredArticle]) -> CorpusStats {
    if records.is_empty() {
        return CorpusStats::default();
    }

    let mut stats = CorpusStats {
        total_articles: records.len(),
        ..Default::default()
    };

    let mut positive_sum = 0.0;
    let mut negative_sum = 0.0;

    for record in records {
        let source = record.source.as_deref().unwrap_or("unknown");
        *stats.by_source.entry(source.to_string()).or_insert(0) += 1;

        match record.bias.bias_type {
            BiasType::LeftLeaning => stats.bias_distribution.left_leaning += 1,
            BiasType::RightLeaning => stats.bias_distribution.right_leaning += 1,
            BiasType::Neutral => stats.bias_distribution.neutral += 1,
            // Counted in total_articles and by_source, but not here
            BiasType::Unknown => {}
        }

        positive_sum += record.sentiment.positive;
        negative_sum += record.sentiment.negative;
    }

    let n = records.len() as f64;
    stats.avg_sentiment.positive = round4(positive_sum / n);
    stats.avg_sentiment.negative = round4(negative_sum / n);

    stats
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use analysis::{BiasResult, Overall, SentimentResult};

    use super::*;

    fn record(
        source: Option<&str>,
        bias_type: BiasType,
        positive: f64,
        negative: f64,
    ) -> StoredArticle {
        StoredArticle {
            source: source.map(str::to_string),
            title: "t".to_string(),
            url: "http://example.com".to_string(),
            published: None,
            summary: None,
            sentiment: SentimentResult {
                negative,
                positive,
                overall: Overall::Neutral,
            },
            bias: BiasResult {
                bias_type,
                ..BiasResult::unknown()
            },
            analyzed_at: "2025-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_empty_corpus() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total_articles, 0);
        assert!(stats.by_source.is_empty());
        assert_eq!(stats.bias_distribution.left_leaning, 0);
        assert_eq!(stats.bias_distribution.right_leaning, 0);
        assert_eq!(stats.bias_distribution.neutral, 0);
        assert_eq!(stats.avg_sentiment.positive, 0.0);
        assert_eq!(stats.avg_sentiment.negative, 0.0);
    }

    #[test]
    fn test_source_counts_and_unknown_default() {
        let records = vec![
            record(Some("bbc"), BiasType::Neutral, 0.5, 0.5),
            record(Some("bbc"), BiasType::Neutral, 0.5, 0.5),
            record(None, BiasType::Neutral, 0.5, 0.5),
        ];
        let stats = aggregate(&records);
        assert_eq!(stats.total_articles, 3);
        assert_eq!(stats.by_source["bbc"], 2);
        assert_eq!(stats.by_source["unknown"], 1);
    }

    #[test]
    fn test_unknown_bias_diverges_from_total() {
        let records: Vec<_> = (0..4)
            .map(|_| record(Some("cnn"), BiasType::Unknown, 0.5, 0.5))
            .collect();
        let stats = aggregate(&records);

        assert_eq!(stats.total_articles, 4);
        assert_eq!(stats.by_source["cnn"], 4);
        let distribution_sum = stats.bias_distribution.left_leaning
            + stats.bias_distribution.right_leaning
            + stats.bias_distribution.neutral;
        assert_eq!(distribution_sum, 0);
    }

    #[test]
    fn test_bias_distribution_counts() {
        let records = vec![
            record(Some("a"), BiasType::LeftLeaning, 0.5, 0.5),
            record(Some("a"), BiasType::LeftLeaning, 0.5, 0.5),
            record(Some("a"), BiasType::RightLeaning, 0.5, 0.5),
            record(Some("a"), BiasType::Neutral, 0.5, 0.5),
            record(Some("a"), BiasType::Unknown, 0.5, 0.5),
        ];
        let stats = aggregate(&records);
        assert_eq!(stats.bias_distribution.left_leaning, 2);
        assert_eq!(stats.bias_distribution.right_leaning, 1);
        assert_eq!(stats.bias_distribution.neutral, 1);
    }

    #[test]
    fn test_average_sentiment_rounded() {
        let records = vec![
            record(Some("a"), BiasType::Neutral, 0.9001, 0.0999),
            record(Some("a"), BiasType::Neutral, 0.3, 0.7),
            record(Some("a"), BiasType::Neutral, 0.5, 0.5),
        ];
        let stats = aggregate(&records);
        // (0.9001 + 0.3 + 0.5) / 3 = 0.56670, (0.0999 + 0.7 + 0.5) / 3 = 0.43330
        assert_eq!(stats.avg_sentiment.positive, 0.5667);
        assert_eq!(stats.avg_sentiment.negative, 0.4333);
    }
}
