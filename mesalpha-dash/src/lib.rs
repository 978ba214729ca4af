//! mesalpha-dash library - manufacturing dashboard backend
//!
//! Reads production and maintenance records, runs them through the
//! aggregation pipeline and serves the chart-ready results as JSON.

use std::sync::Arc;

use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod pipeline;
pub mod service;
pub mod store;

use service::DashboardService;

/// Module name reported by the health endpoint
pub const MODULE_NAME: &str = "mesalpha-dash";

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DashboardService>,
}

impl AppState {
    pub fn new(service: Arc<DashboardService>) -> Self {
        Self { service }
    }
}

/// Build application router
///
/// Every route is a read; the dashboard never writes to the store.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let api = Router::new()
        .route("/api/production", get(api::get_production))
        .route("/api/production/filters", get(api::get_filter_options))
        .route("/api/maintenance", get(api::get_maintenance))
        .route("/api/snapshot", get(api::get_snapshot));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
