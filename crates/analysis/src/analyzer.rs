use chrono::Utc;

use crate::classifier::SentimentClassifier;
use crate::lexicon::LexicalBiasScorer;
use crate::schema::ArticleAnalysis;

/// Words kept from the combined title+body before analysis. The
/// classifier applies its own character clip on top of this.
const MAX_ANALYSIS_WORDS: usize = 512;

/// Composes the sentiment classifier and the lexical scorer over a
/// normalized title+body text, producing one analysis record per article.
#[derive(Clone)]
pub struct ArticleAnalyzer {
    classifier: SentimentClassifier,
    scorer: LexicalBiasScorer,
}

impl ArticleAnalyzer {
    pub fn new(classifier: SentimentClassifier) -> Self {
        Self {
            classifier,
            scorer: LexicalBiasScorer::new(),
        }
    }

    /// Analyze one article. Never fails: both sub-components degrade to
    /// well-formed defaults on error, so every call yields a record.
    pub fn analyze(&self, title: &str, text: &str) -> ArticleAnalysis {
        let full_text = format!("{title}. {text}");
        let full_text = truncate_words(&full_text, MAX_ANALYSIS_WORDS);

        let sentiment = self.classifier.classify(&full_text);
        let bias = self.scorer.score(&full_text);

        ArticleAnalysis {
            sentiment,
            bias,
            analyzed_at: Utc::now().to_rfc3339(),
        }
    }
}

fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        text.to_string()
    } else {
        words[..max_words].join(" ")
    }
}
