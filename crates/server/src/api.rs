//! JSON API routes for the scoring engines.
//!
//! Endpoints:
//! - `POST /api/recommendations`      — ranked recommendations for a profile
//! - `GET  /api/recommendations`      — convenience wrapper over the POST path
//! - `GET  /api/search/smart`         — multi-strategy product search

use std::sync::Arc;
use std::time::Instant;

use artisan_core::catalog::Catalog;
use artisan_core::config::EngineConfig;
use artisan_core::errors::{ApplicationError, InterfaceError};
use artisan_core::recommend::{
    Recommendation, RecommendationEngine, RecommendationRequest, RecommendationStrategy,
    UserPreferences,
};
use artisan_core::search::{SearchEngine, SearchHit, SearchRequest};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct ApiState {
    pub catalog: Arc<Catalog>,
    pub recommender: RecommendationEngine,
    pub searcher: SearchEngine,
    pub default_search_limit: usize,
}

impl ApiState {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            recommender: RecommendationEngine::new(),
            searcher: SearchEngine::new(),
            default_search_limit: artisan_core::search::DEFAULT_LIMIT,
        }
    }

    pub fn from_config(catalog: Arc<Catalog>, engine: &EngineConfig) -> Self {
        Self {
            catalog,
            recommender: RecommendationEngine::with_limits(
                artisan_core::recommend::STRATEGY_LIMIT,
                engine.hybrid_limit,
            ),
            searcher: SearchEngine::with_suggestion_limit(engine.suggestion_limit),
            default_search_limit: engine.default_limit,
        }
    }
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendBody {
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub strategy: Option<String>,
    pub user_preferences: Option<UserPreferences>,
    pub user_location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecommendQuery {
    #[serde(rename = "type")]
    pub strategy: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendResponse {
    pub success: bool,
    #[serde(rename = "type")]
    pub strategy_label: &'static str,
    pub recommendations: Vec<Recommendation>,
    pub total_count: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<usize>,
    pub category: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<f64>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub results: Vec<SearchHit>,
    pub total_count: usize,
    pub suggestions: Vec<String>,
    /// Measured handler duration in milliseconds.
    pub search_time: f64,
    pub filters: FilterSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSummary {
    pub categories: Vec<String>,
    pub price_range: PriceBounds,
}

#[derive(Debug, Serialize)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/recommendations", post(recommendations_post).get(recommendations_get))
        .route("/api/search/smart", get(smart_search))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn recommendations_post(
    State(state): State<ApiState>,
    Json(body): Json<RecommendBody>,
) -> Result<Json<RecommendResponse>, (StatusCode, Json<ApiError>)> {
    let correlation_id = Uuid::new_v4().to_string();
    respond_with_recommendations(&state, body, &correlation_id)
}

pub async fn recommendations_get(
    State(state): State<ApiState>,
    Query(params): Query<RecommendQuery>,
) -> Result<Json<RecommendResponse>, (StatusCode, Json<ApiError>)> {
    let correlation_id = Uuid::new_v4().to_string();
    let body = RecommendBody {
        user_id: params.user_id,
        strategy: params.strategy,
        user_preferences: None,
        user_location: None,
    };
    respond_with_recommendations(&state, body, &correlation_id)
}

fn respond_with_recommendations(
    state: &ApiState,
    body: RecommendBody,
    correlation_id: &str,
) -> Result<Json<RecommendResponse>, (StatusCode, Json<ApiError>)> {
    let strategy = match body.strategy.as_deref() {
        None | Some("") => RecommendationStrategy::default(),
        Some(raw) => raw
            .parse::<RecommendationStrategy>()
            .map_err(|error| reject(ApplicationError::from(error), correlation_id))?,
    };

    let preferences = body.user_preferences.unwrap_or_else(UserPreferences::sample);
    let mut request =
        RecommendationRequest::new(strategy).with_preferences(preferences);
    if let Some(location) = body.user_location {
        request = request.with_location(location);
    }

    let recommendations = state
        .recommender
        .recommend(&request, &state.catalog, &mut rand::thread_rng())
        .map_err(|error| reject(ApplicationError::from(error), correlation_id))?;

    info!(
        event_name = "api.recommendations.served",
        correlation_id = %correlation_id,
        strategy = ?strategy,
        user_id = body.user_id.as_deref().unwrap_or("anonymous"),
        result_count = recommendations.len(),
        "recommendations generated"
    );

    let total_count = recommendations.len();
    Ok(Json(RecommendResponse {
        success: true,
        strategy_label: strategy.label(),
        recommendations,
        total_count,
    }))
}

pub async fn smart_search(
    State(state): State<ApiState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ApiError>)> {
    let correlation_id = Uuid::new_v4().to_string();
    let started = Instant::now();

    let query = params.q.unwrap_or_default();
    let mut request = SearchRequest::new(query.clone())
        .map_err(|error| reject(ApplicationError::from(error), &correlation_id))?
        .with_limit(params.limit.unwrap_or(state.default_search_limit));
    if let Some(category) = params.category {
        request = request.with_category(category);
    }
    request = request
        .with_price_range(
            params.min_price.unwrap_or(0.0),
            params.max_price.unwrap_or(artisan_core::search::DEFAULT_MAX_PRICE),
        )
        .map_err(|error| reject(ApplicationError::from(error), &correlation_id))?;

    let outcome = state
        .searcher
        .search(&request, &state.catalog)
        .map_err(|error| reject(ApplicationError::from(error), &correlation_id))?;

    let (min, max) = state.catalog.price_bounds();
    let search_time = started.elapsed().as_secs_f64() * 1_000.0;

    info!(
        event_name = "api.search.served",
        correlation_id = %correlation_id,
        query = %query,
        result_count = outcome.hits.len(),
        search_time_ms = search_time,
        "search completed"
    );

    let total_count = outcome.hits.len();
    Ok(Json(SearchResponse {
        success: true,
        query,
        results: outcome.hits,
        total_count,
        suggestions: outcome.suggestions,
        search_time,
        filters: FilterSummary {
            categories: state.catalog.categories(),
            price_range: PriceBounds { min, max },
        },
    }))
}

/// Map an application error onto the wire: client faults become 400 with the
/// domain message, everything else becomes an opaque 500.
fn reject(error: ApplicationError, correlation_id: &str) -> (StatusCode, Json<ApiError>) {
    let interface = error.into_interface(correlation_id);
    match &interface {
        InterfaceError::BadRequest { message, .. } => {
            warn!(
                event_name = "api.request.rejected",
                correlation_id = %correlation_id,
                error = %message,
                "client request rejected"
            );
            (StatusCode::BAD_REQUEST, Json(ApiError { success: false, error: message.clone() }))
        }
        InterfaceError::Internal { message, .. } => {
            tracing::error!(
                event_name = "api.request.failed",
                correlation_id = %correlation_id,
                error = %message,
                "internal error while serving request"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError { success: false, error: interface.user_message().to_owned() }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ApiState {
        ApiState::new(Arc::new(Catalog::sample()))
    }

    #[tokio::test]
    async fn post_defaults_to_hybrid_with_sample_profile() {
        let Json(response) =
            recommendations_post(State(state()), Json(RecommendBody::default())).await.unwrap();

        assert!(response.success);
        assert_eq!(response.strategy_label, "Recommended for you");
        assert!(!response.recommendations.is_empty());
        assert_eq!(response.total_count, response.recommendations.len());
        for rec in &response.recommendations {
            assert!(!rec.reason.is_empty());
            assert!((0.7..1.0).contains(&rec.confidence));
        }
    }

    #[tokio::test]
    async fn unknown_strategy_is_a_client_error() {
        let body = RecommendBody { strategy: Some("popular".into()), ..RecommendBody::default() };
        let result = recommendations_post(State(state()), Json(body)).await;

        let (status, Json(error)) = result.err().expect("rejection");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!error.success);
        assert!(error.error.contains("popular"));
    }

    #[tokio::test]
    async fn trending_request_reports_its_label() {
        let body = RecommendBody { strategy: Some("trending".into()), ..RecommendBody::default() };
        let Json(response) = recommendations_post(State(state()), Json(body)).await.unwrap();

        assert_eq!(response.strategy_label, "Trending now");
        // Wall hanging outranks the bowl under the trending formula.
        let ids: Vec<&str> =
            response.recommendations.iter().map(|r| r.product.id.as_str()).collect();
        let wall_hanging = ids.iter().position(|id| *id == "3").unwrap();
        let bowl = ids.iter().position(|id| *id == "1").unwrap();
        assert!(wall_hanging < bowl);
    }

    #[tokio::test]
    async fn get_wrapper_forwards_strategy() {
        let params = RecommendQuery { strategy: Some("content".into()), user_id: None };
        let Json(response) = recommendations_get(State(state()), Query(params)).await.unwrap();

        assert_eq!(response.strategy_label, "Personalized for you");
        assert!(!response.recommendations.is_empty());
    }

    #[tokio::test]
    async fn search_requires_a_query() {
        let result = smart_search(State(state()), Query(SearchParams::default())).await;

        let (status, Json(error)) = result.err().expect("rejection");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!error.success);
        assert!(error.error.contains("query"));
    }

    #[tokio::test]
    async fn search_returns_results_and_filter_metadata() {
        let params = SearchParams { q: Some("ceramic".into()), ..SearchParams::default() };
        let Json(response) = smart_search(State(state()), Query(params)).await.unwrap();

        assert!(response.success);
        assert_eq!(response.query, "ceramic");
        assert!(response.results.iter().any(|hit| hit.product.id.as_str() == "1"));
        assert!(response.suggestions.contains(&"ceramic bowls".to_owned()));
        assert!(response.search_time >= 0.0);
        assert_eq!(
            response.filters.categories,
            vec!["Ceramics", "Jewelry", "Textiles", "Woodwork"]
        );
        assert_eq!(response.filters.price_range.min, 78.0);
        assert_eq!(response.filters.price_range.max, 165.0);
    }

    #[tokio::test]
    async fn search_honors_price_filters() {
        let params = SearchParams {
            q: Some("handmade".into()),
            min_price: Some(100.0),
            max_price: Some(200.0),
            ..SearchParams::default()
        };
        let Json(response) = smart_search(State(state()), Query(params)).await.unwrap();

        assert!(response.results.iter().all(|hit| hit.product.price >= 100.0));
        assert!(response.results.iter().all(|hit| hit.product.price <= 200.0));
    }

    #[tokio::test]
    async fn inverted_search_price_range_is_rejected() {
        let params = SearchParams {
            q: Some("handmade".into()),
            min_price: Some(300.0),
            max_price: Some(100.0),
            ..SearchParams::default()
        };
        let result = smart_search(State(state()), Query(params)).await;

        let (status, _) = result.err().expect("rejection");
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
