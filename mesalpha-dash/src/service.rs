//! Dashboard refresh and last-good caching
//!
//! A refresh fetches a fresh batch, runs the pipeline and replaces the
//! cached view wholesale. When the store fails the previous view is kept
//! and the failure is reported to the caller, which decides how to show it.
//!
//! Refreshes may overlap. Each one is numbered when it starts and the cache
//! only ever moves forward, so a slow refresh that finishes late cannot
//! replace the view of a request made after it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use mesalpha_common::db::{FareloSample, MaintenanceEvent, ProductionSample};
use mesalpha_common::{Error, Result};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::pipeline::{
    build_stacked_series, clean, compute_kpis, failure_distribution, faults_by_tag,
    monthly_humidity, monthly_meal_protein, monthly_moisture, monthly_output_volume,
    CleanedMaintenanceEvent, FailureCount, FilterContext, FilterOptions, MaintenanceKpis,
    MonthlyPoint, StackedSeries, TagCount,
};
use crate::store::RecordStore;

/// Production charts for one filter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionView {
    pub filter: FilterContext,
    /// Monthly soybean output (sum)
    pub volume: Vec<MonthlyPoint>,
    /// Monthly meal moisture (average)
    pub moisture: Vec<MonthlyPoint>,
    pub humidity: Vec<MonthlyPoint>,
    pub meal_protein: Vec<MonthlyPoint>,
}

impl ProductionView {
    pub fn build(filter: FilterContext, production: &[ProductionSample], farelo: &[FareloSample]) -> Self {
        Self {
            filter,
            volume: monthly_output_volume(production, &filter),
            moisture: monthly_moisture(farelo, &filter),
            humidity: monthly_humidity(production, &filter),
            meal_protein: monthly_meal_protein(farelo, &filter),
        }
    }
}

/// Maintenance charts and counters for one batch
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceView {
    pub events: Vec<CleanedMaintenanceEvent>,
    pub kpis: MaintenanceKpis,
    pub stacked: StackedSeries,
    pub faults_by_tag: Vec<TagCount>,
    pub failure_distribution: Vec<FailureCount>,
}

impl MaintenanceView {
    pub fn build(raw_events: &[MaintenanceEvent]) -> Self {
        let events = clean(raw_events);
        Self {
            kpis: compute_kpis(&events),
            stacked: build_stacked_series(&events),
            faults_by_tag: faults_by_tag(&events),
            failure_distribution: failure_distribution(&events),
            events,
        }
    }
}

/// A cached view and the number of the refresh that built it
#[derive(Debug)]
struct Generation<V> {
    number: u64,
    view: V,
}

/// Last-good view slot that rejects views from older refreshes
struct ViewCache<V> {
    next: AtomicU64,
    slot: RwLock<Option<Generation<V>>>,
}

impl<V: Clone> ViewCache<V> {
    fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
            slot: RwLock::new(None),
        }
    }

    /// Number a refresh as it starts
    fn begin(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Store `view` unless a later refresh already did; returns whether it was stored
    async fn install(&self, number: u64, view: V) -> bool {
        let mut slot = self.slot.write().await;
        if slot.as_ref().is_some_and(|current| current.number > number) {
            return false;
        }
        *slot = Some(Generation { number, view });
        true
    }

    async fn get(&self) -> Option<V> {
        self.slot.read().await.as_ref().map(|g| g.view.clone())
    }
}

pub struct DashboardService {
    store: Arc<dyn RecordStore>,
    production: ViewCache<ProductionView>,
    maintenance: ViewCache<MaintenanceView>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            production: ViewCache::new(),
            maintenance: ViewCache::new(),
        }
    }

    /// Fetch both production series with the same filter and rebuild the view
    pub async fn refresh_production(&self, filter: FilterContext) -> Result<ProductionView> {
        let generation = self.production.begin();
        let (production, farelo) = tokio::try_join!(
            self.store.fetch_production(&filter),
            self.store.fetch_farelo(&filter)
        )
        .map_err(|e| unavailable("production", e))?;

        let view = ProductionView::build(filter, &production, &farelo);
        info!(
            "Production refreshed ({}): {} volume points, {} moisture points",
            filter,
            view.volume.len(),
            view.moisture.len()
        );

        if !self.production.install(generation, view.clone()).await {
            debug!("Production refresh #{} ({}) superseded, cache kept", generation, filter);
        }
        Ok(view)
    }

    pub async fn refresh_maintenance(&self) -> Result<MaintenanceView> {
        let generation = self.maintenance.begin();
        let raw_events = self
            .store
            .fetch_maintenance()
            .await
            .map_err(|e| unavailable("maintenance", e))?;

        let view = MaintenanceView::build(&raw_events);
        info!(
            "Maintenance refreshed: {} events, {} equipment, {} in maintenance, {} faults",
            view.events.len(),
            view.kpis.total_equipment,
            view.kpis.equipment_in_maintenance,
            view.kpis.fault_count
        );

        if !self.maintenance.install(generation, view.clone()).await {
            debug!("Maintenance refresh #{} superseded, cache kept", generation);
        }
        Ok(view)
    }

    /// Selector values from the unfiltered production batch
    pub async fn filter_options(&self) -> Result<FilterOptions> {
        let production = self
            .store
            .fetch_production(&FilterContext::ALL)
            .await
            .map_err(|e| unavailable("filter options", e))?;
        Ok(FilterOptions::from_samples(&production))
    }

    /// Last good production view, no I/O
    pub async fn cached_production(&self) -> Option<ProductionView> {
        self.production.get().await
    }

    /// Last good maintenance view, no I/O
    pub async fn cached_maintenance(&self) -> Option<MaintenanceView> {
        self.maintenance.get().await
    }
}

fn unavailable(what: &str, err: Error) -> Error {
    warn!("Record store query for {} failed: {}", what, err);
    match err {
        Error::StoreUnavailable(_) => err,
        other => Error::StoreUnavailable(other.to_string()),
    }
}
