//! Aggregation pipeline
//!
//! Pure, in-memory transformations over an already-fetched batch. Nothing
//! in here performs I/O or needs a rendering context.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

pub mod aggregate;
pub mod cleaner;
pub mod filter;
pub mod kpi;
pub mod pivot;

pub use aggregate::{
    aggregate_monthly, monthly_humidity, monthly_meal_protein, monthly_moisture,
    monthly_output_volume, Aggregation, MonthKey, MonthlyPoint,
};
pub use cleaner::{clean, clean_event, CleanedMaintenanceEvent, NO_FAILURE_LABEL};
pub use filter::{Dated, FilterContext, FilterOptions, MonthFilter, YearFilter};
pub use kpi::{compute_kpis, failure_distribution, faults_by_tag, FailureCount, MaintenanceKpis, TagCount};
pub use pivot::{build_stacked_series, StackedSeries};

/// Chronological order with unknown start times last
pub(crate) fn start_time_order(a: &Option<NaiveDateTime>, b: &Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
