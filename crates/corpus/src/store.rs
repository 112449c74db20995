use analysis::{ArticleAnalysis, BiasResult, SentimentResult};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// An analyzed article as stored in the corpus: the ingested metadata
/// merged with its analysis record. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredArticle {
    pub source: Option<String>,
    pub title: String,
    pub url: String,
    pub published: Option<String>,
    pub summary: Option<String>,
    pub sentiment: SentimentResult,
    pub bias: BiasResult,
    pub analyzed_at: String,
}

impl StoredArticle {
    pub fn new(
        source: Option<String>,
        title: String,
        url: String,
        published: Option<String>,
        summary: Option<String>,
        analysis: ArticleAnalysis,
    ) -> Self {
        Self {
            source,
            title,
            url,
            published,
            summary,
            sentiment: analysis.sentiment,
            bias: analysis.bias,
            analyzed_at: analysis.analyzed_at,
        }
    }
}

/// In-memory article repository. Owns the corpus; readers get cloned
/// snapshots so aggregation always sees a consistent sequence even while
/// ingestion appends concurrently.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    articles: RwLock<Vec<StoredArticle>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, article: StoredArticle) {
        self.articles.write().await.push(article);
    }

    /// Consistent read-only copy of the full corpus.
    pub async fn snapshot(&self) -> Vec<StoredArticle> {
        self.articles.read().await.clone()
    }

    /// Stored articles, optionally filtered by source, newest-first order
    /// not guaranteed (insertion order), truncated to `limit`.
    pub async fn query(&self, source: Option<&str>, limit: usize) -> Vec<StoredArticle> {
        let articles = self.articles.read().await;
        articles
            .iter()
            .filter(|a| match source {
                Some(wanted) => a.source.as_deref() == Some(wanted),
                None => true,
            })
            .take(limit)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.articles.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.articles.write().await.clear();
    }
}
