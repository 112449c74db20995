use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

pub struct Metrics {
    // Counters
    total_requests: AtomicUsize,
    successful_requests: AtomicUsize,
    failed_requests: AtomicUsize,

    // Pipeline counts
    articles_fetched: AtomicUsize,
    articles_analyzed: AtomicUsize,
    cache_hits: AtomicUsize,

    // Timing (in microseconds)
    total_analyze_time_us: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            successful_requests: AtomicUsize::new(0),
            failed_requests: AtomicUsize::new(0),
            articles_fetched: AtomicUsize::new(0),
            articles_analyzed: AtomicUsize::new(0),
            cache_hits: AtomicUsize::new(0),
            total_analyze_time_us: AtomicU64::new(0),
        })
    }

    pub fn record_request(&self, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_fetch(&self, articles: usize) {
        self.articles_fetched.fetch_add(articles, Ordering::Relaxed);
    }

    pub fn record_analysis(&self, duration: std::time::Duration) {
        self.articles_analyzed.fetch_add(1, Ordering::Relaxed);
        self.total_analyze_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let analyzed = self.articles_analyzed.load(Ordering::Relaxed);
        let total_us = self.total_analyze_time_us.load(Ordering::Relaxed) as f64;
        let avg_analyze_time_ms = if analyzed > 0 {
            total_us / analyzed as f64 / 1000.0
        } else {
            0.0
        };

        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            articles_fetched: self.articles_fetched.load(Ordering::Relaxed),
            articles_analyzed: analyzed,
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            avg_analyze_time_ms,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub articles_fetched: usize,
    pub articles_analyzed: usize,
    pub cache_hits: usize,
    pub avg_analyze_time_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts() {
        let metrics = Metrics::new();
        metrics.record_request(true);
        metrics.record_request(false);
        metrics.record_fetch(7);
        metrics.record_analysis(std::time::Duration::from_millis(2));
        metrics.record_cache_hit();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 2);
        assert_eq!(snapshot.successful_requests, 1);
        assert_eq!(snapshot.failed_requests, 1);
        assert_eq!(snapshot.articles_fetched, 7);
        assert_eq!(snapshot.articles_analyzed, 1);
        assert_eq!(snapshot.cache_hits, 1);
        assert!(snapshot.avg_analyze_time_ms > 0.0);
    }

    #[test]
    fn test_empty_snapshot_has_zero_average() {
        let snapshot = Metrics::new().snapshot();
        assert_eq!(snapshot.avg_analyze_time_ms, 0.0);
    }
}
