/// One RSS/Atom outlet the poller pulls from.
#[derive(Debug, Clone, Copy)]
pub struct FeedSource {
    pub name: &'static str,
    pub url: &'static str,
}

/// The default outlet set.
pub const DEFAULT_SOURCES: &[FeedSource] = &[
    FeedSource {
        name: "cnn",
        url: "http://rss.cnn.com/rss/cnn_topstories.rss",
    },
    FeedSource {
        name: "bbc",
        url: "http://feeds.bbci.co.uk/news/rss.xml",
    },
    FeedSource {
        name: "fox",
        url: "http://feeds.foxnews.com/foxnews/latest",
    },
    FeedSource {
        name: "aljazeera",
        url: "https://www.aljazeera.com/xml/rss/all.xml",
    },
    FeedSource {
        name: "reuters",
        url: "https://feeds.reuters.com/reuters/topNews",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources_are_well_formed() {
        assert_eq!(DEFAULT_SOURCES.len(), 5);
        for source in DEFAULT_SOURCES {
            assert!(!source.name.is_empty());
            assert!(source.url.starts_with("http"));
        }
    }
}
