//! Production charts: monthly output volume and meal moisture

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ApiError;
use crate::pipeline::{FilterContext, FilterOptions};
use crate::service::ProductionView;
use crate::AppState;

/// Query parameters for the production charts
#[derive(Debug, Deserialize)]
pub struct ProductionQuery {
    /// `"all"`, `"Todos"`, empty or a year such as `"2024"`
    pub year: Option<String>,
    /// `"all"`, `"Todos"`, empty or a month such as `"02"`
    pub month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductionResponse {
    /// True when the store failed and this is the last good view
    pub stale: bool,
    #[serde(flatten)]
    pub view: ProductionView,
}

/// GET /api/production?year=&month=
///
/// Refreshes both series with one FilterContext. If the store is down and a
/// previous view exists, that view is returned marked stale.
pub async fn get_production(
    State(state): State<AppState>,
    Query(query): Query<ProductionQuery>,
) -> Result<Json<ProductionResponse>, ApiError> {
    let filter = FilterContext::parse(query.year.as_deref(), query.month.as_deref())?;

    match state.service.refresh_production(filter).await {
        Ok(view) => Ok(Json(ProductionResponse { stale: false, view })),
        Err(e) => match state.service.cached_production().await {
            Some(view) => {
                warn!("Serving stale production view ({}): {}", view.filter, e);
                Ok(Json(ProductionResponse { stale: true, view }))
            }
            None => Err(e.into()),
        },
    }
}

/// GET /api/production/filters
pub async fn get_filter_options(
    State(state): State<AppState>,
) -> Result<Json<FilterOptions>, ApiError> {
    let options = state.service.filter_options().await?;
    Ok(Json(options))
}
