pub mod client;
pub mod sources;

pub use client::{ArticleInput, FeedClient};
pub use sources::{DEFAULT_SOURCES, FeedSource};
