mod cache;
mod config;
mod metrics;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use analysis::{ArticleAnalysis, ArticleAnalyzer, SentimentClassifier, SentimentModel};
use corpus::{CorpusStats, InMemoryStore, StoredArticle};
use ingest::{ArticleInput, FeedClient};

use crate::cache::AnalysisCache;
use crate::config::AppConfig;
use crate::metrics::{Metrics, MetricsSnapshot};

#[derive(Clone)]
struct AppState {
    analyzer: Option<Arc<ArticleAnalyzer>>,
    feeds: Arc<FeedClient>,
    store: Arc<InMemoryStore>,
    cache: Arc<AnalysisCache>,
    metrics: Arc<Metrics>,
    config: AppConfig,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message.into(),
        }),
    )
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    components: ComponentStatus,
}

#[derive(Serialize)]
struct ComponentStatus {
    detector: &'static str,
    scraper: &'static str,
}

#[derive(Deserialize)]
struct FetchNewsRequest {
    limit: Option<usize>,
}

#[derive(Serialize)]
struct ArticlesResponse {
    success: bool,
    count: usize,
    articles: Vec<StoredArticle>,
}

#[derive(Deserialize)]
struct ArticlesQuery {
    source: Option<String>,
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct AnalyzeTextRequest {
    text: String,
    title: Option<String>,
}

#[derive(Serialize)]
struct AnalyzeTextResponse {
    success: bool,
    analysis: ArticleAnalysis,
}

#[derive(Serialize)]
struct StatsResponse {
    success: bool,
    stats: CorpusStats,
}

#[derive(Serialize)]
struct ClearResponse {
    success: bool,
    message: &'static str,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();

    // Model load failure must not kill the process; analysis endpoints
    // degrade to 500 until restart and health reports the failed component.
    let analyzer = match SentimentModel::embedded() {
        Ok(model) => {
            info!(vocab_size = model.vocab_size(), "sentiment model loaded");
            let classifier = SentimentClassifier::new(Arc::new(model));
            Some(Arc::new(ArticleAnalyzer::new(classifier)))
        }
        Err(e) => {
            error!(error = %e, "failed to load sentiment model, analysis disabled");
            None
        }
    };

    let state = AppState {
        analyzer,
        feeds: Arc::new(FeedClient::new()),
        store: Arc::new(InMemoryStore::new()),
        cache: Arc::new(AnalysisCache::new(&config.cache)),
        metrics: Metrics::new(),
        config: config.clone(),
    };

    let app = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/fetch-news", post(fetch_news))
        .route("/api/articles", get(get_articles))
        .route("/api/analyze-text", post(analyze_text))
        .route("/api/stats", get(get_stats))
        .route("/api/metrics", get(get_metrics))
        .route("/api/clear", post(clear_articles))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind server address");

    info!(addr = %config.bind_addr, "server listening");

    axum::serve(listener, app).await.expect("Server error");
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        components: ComponentStatus {
            detector: if state.analyzer.is_some() {
                "initialized"
            } else {
                "failed"
            },
            scraper: "initialized",
        },
    })
}

/// Fetch feed entries from every source, analyze each, append to the
/// corpus and return the analyzed batch.
async fn fetch_news(
    State(state): State<AppState>,
    req: Option<Json<FetchNewsRequest>>,
) -> Result<Json<ArticlesResponse>, ApiError> {
    let Some(analyzer) = state.analyzer.clone() else {
        state.metrics.record_request(false);
        return Err(api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Components not initialized",
        ));
    };

    let limit = req
        .and_then(|Json(r)| r.limit)
        .unwrap_or(state.config.default_fetch_limit);

    info!(limit, "fetching news from all sources");

    let inputs = state.feeds.fetch_all(limit).await;
    if inputs.is_empty() {
        state.metrics.record_request(false);
        return Err(api_error(StatusCode::BAD_REQUEST, "No articles fetched"));
    }
    state.metrics.record_fetch(inputs.len());

    let mut analyzed = Vec::new();
    for input in inputs {
        // Prefer full feed content, fall back to the entry summary
        let body = if input.text.trim().is_empty() {
            input.summary.clone()
        } else {
            input.text.clone()
        };
        if body.trim().is_empty() {
            warn!(title = %input.title, "skipping article without content");
            continue;
        }

        let analysis = analyze_with_cache(&state, &analyzer, &input.title, &body);
        let ArticleInput {
            source,
            title,
            url,
            published,
            summary,
            ..
        } = input;

        info!(source = %source, title = %truncate_for_log(&title), "analyzed article");

        let stored = StoredArticle::new(
            Some(source),
            title,
            url,
            published,
            Some(summary),
            analysis,
        );
        state.store.append(stored.clone()).await;
        analyzed.push(stored);
    }

    state.metrics.record_request(true);
    Ok(Json(ArticlesResponse {
        count: analyzed.len(),
        articles: analyzed,
        success: true,
    }))
}

async fn get_articles(
    State(state): State<AppState>,
    Query(query): Query<ArticlesQuery>,
) -> Json<ArticlesResponse> {
    let limit = query.limit.unwrap_or(state.config.articles_page_limit);
    let articles = state.store.query(query.source.as_deref(), limit).await;

    state.metrics.record_request(true);
    Json(ArticlesResponse {
        count: articles.len(),
        articles,
        success: true,
    })
}

/// Analyze caller-supplied text without storing the result.
async fn analyze_text(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeTextResponse>, ApiError> {
    let Some(analyzer) = state.analyzer.clone() else {
        state.metrics.record_request(false);
        return Err(api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Detector not initialized",
        ));
    };

    if req.text.is_empty() {
        state.metrics.record_request(false);
        return Err(api_error(StatusCode::BAD_REQUEST, "No text provided"));
    }

    let title = req.title.as_deref().unwrap_or("Custom Text");
    let analysis = analyze_with_cache(&state, &analyzer, title, &req.text);

    state.metrics.record_request(true);
    Ok(Json(AnalyzeTextResponse {
        success: true,
        analysis,
    }))
}

/// Corpus statistics, recomputed from a consistent snapshot on every call.
async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let records = state.store.snapshot().await;
    let stats = corpus::aggregate(&records);

    state.metrics.record_request(true);
    Json(StatsResponse {
        success: true,
        stats,
    })
}

async fn get_metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

async fn clear_articles(State(state): State<AppState>) -> Json<ClearResponse> {
    state.store.clear().await;
    state.metrics.record_request(true);
    Json(ClearResponse {
        success: true,
        message: "All articles cleared",
    })
}

/// Run the analyzer, reusing cached scores for identical content. A cache
/// hit still gets a fresh `analyzed_at` stamp.
fn analyze_with_cache(
    state: &AppState,
    analyzer: &ArticleAnalyzer,
    title: &str,
    text: &str,
) -> ArticleAnalysis {
    if let Some((sentiment, bias)) = state.cache.get(title, text) {
        state.metrics.record_cache_hit();
        return ArticleAnalysis {
            sentiment,
            bias,
            analyzed_at: Utc::now().to_rfc3339(),
        };
    }

    let start = Instant::now();
    let analysis = analyzer.analyze(title, text);
    state.metrics.record_analysis(start.elapsed());

    state
        .cache
        .set(title, text, analysis.sentiment.clone(), analysis.bias.clone());
    analysis
}

fn truncate_for_log(title: &str) -> &str {
    match title.char_indices().nth(50) {
        Some((idx, _)) => &title[..idx],
        None => title,
    }
}
