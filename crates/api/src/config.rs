use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub bind_addr: String,
    pub default_fetch_limit: usize,
    pub articles_page_limit: usize,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            default_fetch_limit: 5,
            articles_page_limit: 50,
            cache: CacheConfig {
                enabled: true,
                max_entries: 10000,
            },
        }
    }
}

impl AppConfig {
    /// Defaults with environment overrides (PORT, BIND_ADDR, FETCH_LIMIT,
    /// CACHE_ENABLED).
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(port) = std::env::var("PORT") {
            if port.parse::<u16>().is_ok() {
                config.bind_addr = format!("0.0.0.0:{port}");
            }
        }
        if let Ok(addr) = std::env::var("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(limit) = std::env::var("FETCH_LIMIT") {
            if let Ok(n) = limit.parse() {
                config.default_fetch_limit = n;
            }
        }
        if let Ok(enabled) = std::env::var("CACHE_ENABLED") {
            config.cache.enabled = !matches!(enabled.to_lowercase().as_str(), "0" | "false");
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert_eq!(config.default_fetch_limit, 5);
        assert_eq!(config.articles_page_limit, 50);
        assert!(config.cache.enabled);
    }
}
