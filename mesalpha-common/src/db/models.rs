//! Database models
//!
//! Rows as they come out of the record store, after timestamp coercion but
//! before any cleaning. Values are never mutated once read; every derived
//! form is a new value.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One daily soybean production sample (`ProducaoSoja`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionSample {
    pub date: NaiveDate,
    /// Daily output volume, non-negative
    pub daily_output: f64,
    pub humidity: f64,
    pub protein_pct: f64,
    pub impurity_pct: f64,
}

/// One toasted soybean meal quality sample (`FareloSojaTostado`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareloSample {
    pub date: NaiveDate,
    pub moisture_pct: f64,
    pub protein_pct: f64,
    pub fat_pct: f64,
}

/// Raw maintenance event (`TabelaTeste`)
///
/// `end_time == None` means the equipment is still under maintenance.
/// `start_time` is `None` only when the stored value could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceEvent {
    /// Equipment identifier
    pub tag: String,
    /// Maintenance type (corrective, preventive, ...)
    pub kind: Option<String>,
    pub failure_reason: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    /// Duration as `H:MM:SS` text, exactly as stored
    pub duration_clock: Option<String>,
    pub operator: Option<String>,
}
