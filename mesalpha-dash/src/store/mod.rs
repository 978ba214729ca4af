//! Record store access
//!
//! The store is read-only from the dashboard's point of view. Each fetch
//! returns a fresh, independently owned batch.

use async_trait::async_trait;
use mesalpha_common::db::{FareloSample, MaintenanceEvent, ProductionSample};
use mesalpha_common::Result;

use crate::pipeline::{start_time_order, FilterContext};

mod memory;
mod sqlite;

pub use memory::InMemoryRecordStore;
pub use sqlite::SqliteRecordStore;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Soybean production rows inside `filter`
    async fn fetch_production(&self, filter: &FilterContext) -> Result<Vec<ProductionSample>>;

    /// Soybean meal rows inside `filter`
    async fn fetch_farelo(&self, filter: &FilterContext) -> Result<Vec<FareloSample>>;

    /// All maintenance events ordered by (tag, start time)
    async fn fetch_maintenance(&self) -> Result<Vec<MaintenanceEvent>>;
}

pub(crate) fn sort_maintenance(events: &mut [MaintenanceEvent]) {
    events.sort_by(|a, b| {
        a.tag
            .cmp(&b.tag)
            .then_with(|| start_time_order(&a.start_time, &b.start_time))
    });
}
