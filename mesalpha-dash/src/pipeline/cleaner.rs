//! Maintenance batch normalisation
//!
//! Produces a new cleaned value per raw event. Missing or malformed fields
//! degrade to defaults; nothing here can fail.

use chrono::NaiveDateTime;
use mesalpha_common::db::MaintenanceEvent;
use mesalpha_common::human_time::{parse_clock, EMPTY_CLOCK};
use tracing::debug;

/// Label shown for events without a reported failure
pub const NO_FAILURE_LABEL: &str = "Sem Falha";

/// Placeholder operators type instead of leaving a cell empty
const PLACEHOLDER: &str = "-";

/// Maintenance event after cleaning.
///
/// An absent failure is `None` here; [`NO_FAILURE_LABEL`] is only applied
/// when handing the event to presentation via [`failure_label`].
///
/// [`failure_label`]: CleanedMaintenanceEvent::failure_label
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedMaintenanceEvent {
    pub tag: String,
    pub kind: Option<String>,
    pub failure: Option<String>,
    pub description: String,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    /// Computed from the stored clock string, before any display default
    pub duration_hours: f64,
    /// Display copy of the clock string
    pub duration_clock: String,
    pub operator: Option<String>,
}

impl CleanedMaintenanceEvent {
    /// Still open: the event has no end time yet
    pub fn is_under_maintenance(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn has_failure(&self) -> bool {
        self.failure.is_some()
    }

    pub fn failure_label(&self) -> &str {
        self.failure.as_deref().unwrap_or(NO_FAILURE_LABEL)
    }
}

fn normalize_failure(raw: Option<&str>) -> Option<String> {
    match raw {
        None | Some("") | Some(PLACEHOLDER) | Some(NO_FAILURE_LABEL) => None,
        Some(reason) => Some(reason.to_string()),
    }
}

fn normalize_description(raw: Option<&str>) -> String {
    match raw {
        None | Some(PLACEHOLDER) => String::new(),
        Some(text) => text.to_string(),
    }
}

/// Clean one event
pub fn clean_event(raw: &MaintenanceEvent) -> CleanedMaintenanceEvent {
    let duration_hours = match raw.duration_clock.as_deref() {
        Some(clock) => parse_clock(clock).unwrap_or_else(|| {
            debug!("Malformed duration {:?} for tag {}, using 0h", clock, raw.tag);
            0.0
        }),
        None => 0.0,
    };

    CleanedMaintenanceEvent {
        tag: raw.tag.clone(),
        kind: raw.kind.clone(),
        failure: normalize_failure(raw.failure_reason.as_deref()),
        description: normalize_description(raw.description.as_deref()),
        start_time: raw.start_time,
        end_time: raw.end_time,
        duration_hours,
        duration_clock: raw
            .duration_clock
            .clone()
            .unwrap_or_else(|| EMPTY_CLOCK.to_string()),
        operator: raw.operator.clone(),
    }
}

/// Clean a batch, preserving row order
pub fn clean(raw_events: &[MaintenanceEvent]) -> Vec<CleanedMaintenanceEvent> {
    let cleaned: Vec<CleanedMaintenanceEvent> = raw_events.iter().map(clean_event).collect();
    debug!("Cleaned {} maintenance events", cleaned.len());
    cleaned
}
