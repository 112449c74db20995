pub mod stats;
pub mod store;

pub use stats::{AvgSentiment, BiasDistribution, CorpusStats, aggregate};
pub use store::{InMemoryStore, StoredArticle};
