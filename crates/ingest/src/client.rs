use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::sources::{DEFAULT_SOURCES, FeedSource};

const FETCH_TIMEOUT_SECS: u64 = 15;
const USER_AGENT: &str = "newslens-ingest/0.1";

/// One raw article handed to the analysis layer. `text` is the inline
/// feed content when the outlet provides one; `summary` is the entry
/// summary and serves as the substitute when `text` is empty. Full-article
/// download is out of scope here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleInput {
    pub source: String,
    pub title: String,
    pub url: String,
    pub published: Option<String>,
    pub summary: String,
    pub text: String,
}

/// RSS/Atom feed poller over the fixed outlet set.
pub struct FeedClient {
    client: reqwest::Client,
}

impl FeedClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .expect("Failed to build feed HTTP client");
        Self { client }
    }

    /// Fetch and parse one feed, returning up to `limit` article inputs.
    pub async fn fetch_source(&self, source: &FeedSource, limit: usize) -> Result<Vec<ArticleInput>> {
        let resp = self
            .client
            .get(source.url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .with_context(|| format!("Feed fetch failed for {}", source.name))?;

        let bytes = resp
            .bytes()
            .await
            .with_context(|| format!("Failed to read feed body for {}", source.name))?;

        let feed = feed_rs::parser::parse(&bytes[..])
            .with_context(|| format!("Failed to parse feed for {}", source.name))?;

        let articles = map_entries(source.name, feed.entries, limit);
        info!(source = source.name, count = articles.len(), "feed fetched");
        Ok(articles)
    }

    /// Fetch every default source. A dead feed is logged and skipped;
    /// one bad outlet never aborts the batch.
    pub async fn fetch_all(&self, limit_per_source: usize) -> Vec<ArticleInput> {
        let mut all = Vec::new();
        for source in DEFAULT_SOURCES {
            match self.fetch_source(source, limit_per_source).await {
                Ok(articles) => all.extend(articles),
                Err(e) => {
                    warn!(source = source.name, error = %e, "skipping failed feed");
                }
            }
        }
        info!(total = all.len(), "feed batch complete");
        all
    }
}

impl Default for FeedClient {
    fn default() -> Self {
        Self::new()
    }
}

fn map_entries(
    source: &str,
    entries: Vec<feed_rs::model::Entry>,
    limit: usize,
) -> Vec<ArticleInput> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let url = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .or_else(|| entry.id.starts_with("http").then(|| entry.id.clone()))?;

            Some(ArticleInput {
                source: source.to_string(),
                title: entry
                    .title
                    .map(|t| t.content)
                    .unwrap_or_else(|| "No title".to_string()),
                url,
                published: entry
                    .published
                    .or(entry.updated)
                    .map(|dt| dt.to_rfc3339()),
                summary: entry.summary.map(|t| t.content).unwrap_or_default(),
                text: entry.content.and_then(|c| c.body).unwrap_or_default(),
            })
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Sample Feed</title>
    <item>
      <title>First headline</title>
      <link>http://example.com/first</link>
      <description>First summary text</description>
      <pubDate>Mon, 01 Jan 2024 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Second headline</title>
      <link>http://example.com/second</link>
      <description>Second summary text</description>
    </item>
    <item>
      <link>http://example.com/untitled</link>
    </item>
  </channel>
</rss>"#;

    fn parse_sample() -> Vec<feed_rs::model::Entry> {
        feed_rs::parser::parse(SAMPLE_RSS.as_bytes()).unwrap().entries
    }

    #[test]
    fn test_map_entries_basic_fields() {
        let articles = map_entries("sample", parse_sample(), 10);
        assert_eq!(articles.len(), 3);

        assert_eq!(articles[0].source, "sample");
        assert_eq!(articles[0].title, "First headline");
        assert_eq!(articles[0].url, "http://example.com/first");
        assert_eq!(articles[0].summary, "First summary text");
        assert!(articles[0].text.is_empty());
        assert!(articles[0].published.is_some());

        assert!(articles[1].published.is_none());
    }

    #[test]
    fn test_map_entries_defaults_missing_title() {
        let articles = map_entries("sample", parse_sample(), 10);
        assert_eq!(articles[2].title, "No title");
        assert!(articles[2].summary.is_empty());
    }

    #[test]
    fn test_map_entries_respects_limit() {
        let articles = map_entries("sample", parse_sample(), 2);
        assert_eq!(articles.len(), 2);
    }
}
