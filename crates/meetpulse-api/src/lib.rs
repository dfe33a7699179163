//! # meetpulse-api
//!
//! HTTP surface of the meetpulse feedback tracker: profiles with derived
//! host statistics, meetings, feedback, and stored AI insights.
//!
//! The router is built from an [`AppState`] holding the store capabilities
//! and the statistics service, so tests can drive it against the in-memory
//! store without a server.

pub mod config;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod services;

pub use config::{ServerConfig, StoreBackend};
pub use error::ApiError;
pub use services::{StatsCache, StatsService};

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use meetpulse_core::Repositories;

use handlers::{feedback, health, insights, meetings, profile};

/// Maximum accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub stats: StatsService,
}

impl AppState {
    /// State over `repos` with a stats cache of `cache_capacity` entries
    /// (`0` disables caching).
    pub fn new(repos: Repositories, cache_capacity: usize) -> Self {
        let stats = StatsService::new(repos.clone(), StatsCache::new(cache_capacity));
        Self { repos, stats }
    }
}

/// Generates UUIDv7 request ids (time-ordered) for `x-request-id`.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Application routes without middleware.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .route("/api/profile", axum::routing::post(profile::save_profile))
        .route("/api/profile/:identity", get(profile::get_profile))
        .route(
            "/api/meetings",
            get(meetings::list_meetings).post(meetings::create_meeting),
        )
        .route("/api/meetings/:id", get(meetings::get_meeting))
        .route(
            "/api/feedback",
            get(feedback::list_feedback).post(feedback::create_feedback),
        )
        .route(
            "/api/ai-insights",
            get(insights::list_insights).post(insights::create_insight),
        )
        .with_state(state)
}

/// Full application: routes plus tracing, request ids, CORS and body limit.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(&config.allowed_origins))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
