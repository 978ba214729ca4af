//! Cached views for re-rendering without a store round trip
//!
//! Theme or page switches only need the last computed aggregates.

use axum::{extract::State, Json};
use serde::Serialize;

use super::maintenance::MaintenanceResponse;
use super::production::ProductionResponse;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub production: Option<ProductionResponse>,
    pub maintenance: Option<MaintenanceResponse>,
}

/// GET /api/snapshot
pub async fn get_snapshot(State(state): State<AppState>) -> Json<SnapshotResponse> {
    let production = state
        .service
        .cached_production()
        .await
        .map(|view| ProductionResponse { stale: false, view });
    let maintenance = state
        .service
        .cached_maintenance()
        .await
        .map(|view| MaintenanceResponse::from_view(&view, false));

    Json(SnapshotResponse {
        production,
        maintenance,
    })
}
