//! Summary counters and breakdowns over a cleaned maintenance batch

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use super::cleaner::{CleanedMaintenanceEvent, NO_FAILURE_LABEL};

/// Headline maintenance counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MaintenanceKpis {
    /// Distinct equipment tags in the batch
    pub total_equipment: usize,
    /// Distinct tags with at least one open event
    pub equipment_in_maintenance: usize,
    /// Events with a reported failure
    pub fault_count: usize,
}

/// Derive the headline counters. An empty batch gives all zeros.
pub fn compute_kpis(events: &[CleanedMaintenanceEvent]) -> MaintenanceKpis {
    let total: HashSet<&str> = events.iter().map(|e| e.tag.as_str()).collect();
    let open: HashSet<&str> = events
        .iter()
        .filter(|e| e.is_under_maintenance())
        .map(|e| e.tag.as_str())
        .collect();
    let fault_count = events.iter().filter(|e| e.has_failure()).count();

    MaintenanceKpis {
        total_equipment: total.len(),
        equipment_in_maintenance: open.len(),
        fault_count,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Faults per equipment, tags ascending. Tags without faults are left out.
pub fn faults_by_tag(events: &[CleanedMaintenanceEvent]) -> Vec<TagCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for event in events.iter().filter(|e| e.has_failure()) {
        *counts.entry(event.tag.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect()
}

/// Events per failure reason; `failure == None` groups events without one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureCount {
    pub failure: Option<String>,
    pub count: usize,
}

impl FailureCount {
    pub fn label(&self) -> &str {
        self.failure.as_deref().unwrap_or(NO_FAILURE_LABEL)
    }
}

/// Distribution of failure reasons, most frequent first, ties by label
pub fn failure_distribution(events: &[CleanedMaintenanceEvent]) -> Vec<FailureCount> {
    let mut counts: HashMap<Option<&str>, usize> = HashMap::new();
    for event in events {
        *counts.entry(event.failure.as_deref()).or_default() += 1;
    }

    let mut distribution: Vec<FailureCount> = counts
        .into_iter()
        .map(|(failure, count)| FailureCount {
            failure: failure.map(str::to_string),
            count,
        })
        .collect();
    distribution.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label().cmp(b.label())));
    distribution
}
