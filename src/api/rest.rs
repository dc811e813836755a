//! REST API Handlers
//!
//! Thin handlers over the report services. Report loading never fails at
//! this layer: load errors travel inside the `ReportsData` payload.

use crate::cache::{CacheKey, ReportCache};
use crate::reports::{CrdDiscoveryService, ReportService};
use axum::{
    extract::{Json, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Cache invalidation response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidateResponse {
    pub key: String,
    /// Whether an entry was actually removed
    pub removed: bool,
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

// =============================================================================
// REST Router
// =============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub discovery: Arc<CrdDiscoveryService>,
    pub reports: Arc<ReportService>,
    pub cache: ReportCache,
}

/// REST API router builder
pub struct RestRouter {
    state: AppState,
}

impl RestRouter {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Build the Axum router
    pub fn build(self) -> Router {
        Router::new()
            // Discovery
            .route("/v1/crds", get(list_crds))
            .route("/v1/crds/cache", delete(invalidate_crds))
            // Reports
            .route("/v1/reports/:plural", get(load_reports))
            .route("/v1/reports/:plural/cache", delete(invalidate_reports))
            .route("/v1/reports/:plural/:namespace/:name", get(get_report))
            // Operations
            .route("/metrics", get(metrics))
            .route("/health", get(health_check))
            .route("/ready", get(readiness_check))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state)
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_crds(State(state): State<AppState>) -> impl IntoResponse {
    let crds = state.discovery.list_relevant_crds().await;
    debug!(count = crds.len(), "Serving CRD list");
    (StatusCode::OK, Json(crds))
}

async fn invalidate_crds(State(state): State<AppState>) -> impl IntoResponse {
    let removed = state.discovery.invalidate().await;
    info!(removed, "Invalidated CRD list cache");
    (
        StatusCode::OK,
        Json(InvalidateResponse {
            key: state.discovery.cache_key().to_storage_key(),
            removed,
        }),
    )
}

async fn load_reports(State(state): State<AppState>, Path(plural): Path<String>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.reports.load_reports(&plural).await))
}

async fn invalidate_reports(
    State(state): State<AppState>,
    Path(plural): Path<String>,
) -> impl IntoResponse {
    let removed = state.reports.invalidate_cache(&plural).await;
    info!(plural = %plural, removed, "Invalidated report cache");
    (
        StatusCode::OK,
        Json(InvalidateResponse {
            key: CacheKey::reports(plural).to_storage_key(),
            removed,
        }),
    )
}

async fn get_report(
    State(state): State<AppState>,
    Path((plural, namespace, name)): Path<(String, String, String)>,
) -> impl IntoResponse {
    match state.reports.get_report(&plural, &namespace, &name).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) if e.is_not_found() => (
            StatusCode::NOT_FOUND,
            Json(ApiErrorResponse {
                error: "not_found".into(),
                message: format!("{} {}/{} not found", plural, namespace, name),
                details: None,
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(ApiErrorResponse {
                error: "cluster_error".into(),
                message: format!("Failed to get {} {}/{}", plural, namespace, name),
                details: Some(e.to_string()),
            }),
        )
            .into_response(),
    }
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
        state.cache.encode_metrics(),
    )
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.cache.health_check().await {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "cache store unavailable")
    }
}
