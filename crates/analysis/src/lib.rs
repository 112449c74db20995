pub mod analyzer;
pub mod classifier;
pub mod lexicon;
pub mod schema;

pub use analyzer::ArticleAnalyzer;
pub use classifier::{SentimentClassifier, SentimentModel};
pub use lexicon::LexicalBiasScorer;
pub use schema::{ArticleAnalysis, BiasResult, BiasType, Overall, SentimentResult};
