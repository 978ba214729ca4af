//! In-memory record store for tests and demos

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use mesalpha_common::db::{FareloSample, MaintenanceEvent, ProductionSample};
use mesalpha_common::{Error, Result};

use super::{sort_maintenance, RecordStore};
use crate::pipeline::FilterContext;

#[derive(Debug)]
pub struct InMemoryRecordStore {
    production: Vec<ProductionSample>,
    farelo: Vec<FareloSample>,
    maintenance: Vec<MaintenanceEvent>,
    available: AtomicBool,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            production: Vec::new(),
            farelo: Vec::new(),
            maintenance: Vec::new(),
            available: AtomicBool::new(true),
        }
    }

    pub fn with_production(mut self, samples: Vec<ProductionSample>) -> Self {
        self.production = samples;
        self
    }

    pub fn with_farelo(mut self, samples: Vec<FareloSample>) -> Self {
        self.farelo = samples;
        self
    }

    pub fn with_maintenance(mut self, events: Vec<MaintenanceEvent>) -> Self {
        self.maintenance = events;
        self
    }

    /// Simulate losing (or regaining) the database
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::StoreUnavailable("in-memory store switched off".to_string()))
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch_production(&self, filter: &FilterContext) -> Result<Vec<ProductionSample>> {
        self.check_available()?;
        Ok(filter.apply(self.production.clone()))
    }

    async fn fetch_farelo(&self, filter: &FilterContext) -> Result<Vec<FareloSample>> {
        self.check_available()?;
        Ok(filter.apply(self.farelo.clone()))
    }

    async fn fetch_maintenance(&self) -> Result<Vec<MaintenanceEvent>> {
        self.check_available()?;
        let mut events = self.maintenance.clone();
        sort_maintenance(&mut events);
        Ok(events)
    }
}
