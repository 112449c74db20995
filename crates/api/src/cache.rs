use analysis::{BiasResult, SentimentResult};
use dashmap::DashMap;
use sha2::{Digest, Sha256};

use crate::config::CacheConfig;

/// Cache of sentiment/bias scores keyed by the hash of the analyzed
/// title+text. A hit skips re-running the analyzer for identical content;
/// the caller re-stamps `analyzed_at`, so cached and fresh records look
/// the same to consumers.
pub struct AnalysisCache {
    entries: DashMap<String, (SentimentResult, BiasResult)>,
    max_entries: usize,
    enabled: bool,
}

impl AnalysisCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: config.max_entries,
            enabled: config.enabled,
        }
    }

    pub fn get(&self, title: &str, text: &str) -> Option<(SentimentResult, BiasResult)> {
        if !self.enabled {
            return None;
        }
        let key = hash_key(title, text);
        self.entries.get(&key).map(|r| r.value().clone())
    }

    pub fn set(&self, title: &str, text: &str, sentiment: SentimentResult, bias: BiasResult) {
        if !self.enabled {
            return;
        }
        if self.entries.len() >= self.max_entries {
            // Simple eviction: clear 25% when full
            let to_remove: Vec<_> = self
                .entries
                .iter()
                .take(self.max_entries / 4)
                .map(|r| r.key().clone())
                .collect();
            for key in to_remove {
                self.entries.remove(&key);
            }
        }
        let key = hash_key(title, text);
        self.entries.insert(key, (sentiment, bias));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn hash_key(title: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update([0u8]);
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
