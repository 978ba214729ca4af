//! Monthly bucketing of production samples

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use mesalpha_common::db::{FareloSample, ProductionSample};
use serde::{Serialize, Serializer};

use super::filter::{Dated, FilterContext};

/// Calendar month bucket, rendered as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Sum,
    Average,
}

/// One point of a monthly series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub month: MonthKey,
    pub value: f64,
}

/// Bucket samples by calendar month.
///
/// Samples outside `filter` are dropped. Months without samples are
/// omitted rather than zero-filled. The result is ascending by month.
/// Values inside a bucket are combined in sorted order, so the output does
/// not depend on the order rows came back from the store.
pub fn aggregate_monthly<T, F>(
    samples: &[T],
    filter: &FilterContext,
    op: Aggregation,
    value: F,
) -> Vec<MonthlyPoint>
where
    T: Dated,
    F: Fn(&T) -> f64,
{
    let mut buckets: BTreeMap<MonthKey, Vec<f64>> = BTreeMap::new();
    for sample in samples {
        let date = sample.date();
        if !filter.matches(date) {
            continue;
        }
        buckets.entry(MonthKey::of(date)).or_default().push(value(sample));
    }

    buckets
        .into_iter()
        .map(|(month, mut values)| {
            values.sort_by(f64::total_cmp);
            let total: f64 = values.iter().sum();
            let value = match op {
                Aggregation::Sum => total,
                Aggregation::Average => total / values.len() as f64,
            };
            MonthlyPoint { month, value }
        })
        .collect()
}

/// Total soybean output per month
pub fn monthly_output_volume(samples: &[ProductionSample], filter: &FilterContext) -> Vec<MonthlyPoint> {
    aggregate_monthly(samples, filter, Aggregation::Sum, |s| s.daily_output)
}

/// Average soybean humidity per month
pub fn monthly_humidity(samples: &[ProductionSample], filter: &FilterContext) -> Vec<MonthlyPoint> {
    aggregate_monthly(samples, filter, Aggregation::Average, |s| s.humidity)
}

/// Average meal moisture per month
pub fn monthly_moisture(samples: &[FareloSample], filter: &FilterContext) -> Vec<MonthlyPoint> {
    aggregate_monthly(samples, filter, Aggregation::Average, |s| s.moisture_pct)
}

/// Average meal crude protein per month
pub fn monthly_meal_protein(samples: &[FareloSample], filter: &FilterContext) -> Vec<MonthlyPoint> {
    aggregate_monthly(samples, filter, Aggregation::Average, |s| s.protein_pct)
}
