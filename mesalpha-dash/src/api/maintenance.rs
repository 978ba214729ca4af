//! Maintenance dashboard: KPI cards, stacked durations, fault breakdowns

use axum::{extract::State, Json};
use chrono::NaiveDateTime;
use mesalpha_common::human_time::hours_to_clock;
use serde::Serialize;
use tracing::warn;

use super::ApiError;
use crate::pipeline::{CleanedMaintenanceEvent, FailureCount, MaintenanceKpis, StackedSeries, TagCount};
use crate::service::MaintenanceView;
use crate::AppState;

/// One event as the maintenance table shows it
#[derive(Debug, Serialize)]
pub struct MaintenanceEventDto {
    pub tag: String,
    pub kind: Option<String>,
    pub failure: String,
    pub description: String,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub under_maintenance: bool,
    pub duration_hours: f64,
    /// Clock string as stored (`00:00:00` when missing)
    pub duration_clock: String,
    /// `HH:MM` tooltip text
    pub duration_display: String,
    pub operator: Option<String>,
}

impl From<&CleanedMaintenanceEvent> for MaintenanceEventDto {
    fn from(event: &CleanedMaintenanceEvent) -> Self {
        Self {
            tag: event.tag.clone(),
            kind: event.kind.clone(),
            failure: event.failure_label().to_string(),
            description: event.description.clone(),
            start_time: event.start_time,
            end_time: event.end_time,
            under_maintenance: event.is_under_maintenance(),
            duration_hours: event.duration_hours,
            duration_clock: event.duration_clock.clone(),
            duration_display: hours_to_clock(event.duration_hours),
            operator: event.operator.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FailureCountDto {
    pub failure: String,
    pub count: usize,
}

impl From<&FailureCount> for FailureCountDto {
    fn from(entry: &FailureCount) -> Self {
        Self {
            failure: entry.label().to_string(),
            count: entry.count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MaintenanceResponse {
    /// True when the store failed and this is the last good view
    pub stale: bool,
    pub kpis: MaintenanceKpis,
    pub stacked: StackedSeries,
    /// `HH:MM` stacked total per tag, aligned with `stacked.tags`
    pub stacked_totals: Vec<String>,
    pub faults_by_tag: Vec<TagCount>,
    pub failure_distribution: Vec<FailureCountDto>,
    pub events: Vec<MaintenanceEventDto>,
}

impl MaintenanceResponse {
    pub fn from_view(view: &MaintenanceView, stale: bool) -> Self {
        Self {
            stale,
            kpis: view.kpis,
            stacked: view.stacked.clone(),
            stacked_totals: view.stacked.totals().into_iter().map(hours_to_clock).collect(),
            faults_by_tag: view.faults_by_tag.clone(),
            failure_distribution: view.failure_distribution.iter().map(Into::into).collect(),
            events: view.events.iter().map(Into::into).collect(),
        }
    }
}

/// GET /api/maintenance
///
/// Refreshes the maintenance batch. Falls back to the last good view,
/// marked stale, when the store is down.
pub async fn get_maintenance(
    State(state): State<AppState>,
) -> Result<Json<MaintenanceResponse>, ApiError> {
    match state.service.refresh_maintenance().await {
        Ok(view) => Ok(Json(MaintenanceResponse::from_view(&view, false))),
        Err(e) => match state.service.cached_maintenance().await {
            Some(view) => {
                warn!("Serving stale maintenance view: {}", e);
                Ok(Json(MaintenanceResponse::from_view(&view, true)))
            }
            None => Err(e.into()),
        },
    }
}
