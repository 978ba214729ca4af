//! Stacked per-equipment duration series
//!
//! Each equipment's events are ranked by start time (0 = first). Series `r`
//! holds every tag's duration at rank `r`, zero where a tag has fewer
//! events, so all series line up with the tag list for stacking.

use serde::Serialize;

use super::cleaner::CleanedMaintenanceEvent;
use super::start_time_order;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StackedSeries {
    /// Equipment tags, ascending
    pub tags: Vec<String>,
    /// `series[rank][tag_index]` in hours
    pub series: Vec<Vec<f64>>,
}

impl StackedSeries {
    /// Highest occurrence rank seen, `None` for an empty batch
    pub fn max_rank(&self) -> Option<usize> {
        self.series.len().checked_sub(1)
    }

    /// Stacked height per tag
    pub fn totals(&self) -> Vec<f64> {
        (0..self.tags.len())
            .map(|i| self.series.iter().map(|s| s[i]).sum())
            .collect()
    }
}

pub fn build_stacked_series(events: &[CleanedMaintenanceEvent]) -> StackedSeries {
    let mut ordered: Vec<&CleanedMaintenanceEvent> = events.iter().collect();
    ordered.sort_by(|a, b| {
        a.tag
            .cmp(&b.tag)
            .then_with(|| start_time_order(&a.start_time, &b.start_time))
    });

    let mut tags: Vec<String> = Vec::new();
    let mut by_rank: Vec<Vec<f64>> = Vec::new();
    for event in ordered {
        let same_tag = tags.last().is_some_and(|last| *last == event.tag);
        if !same_tag {
            tags.push(event.tag.clone());
            by_rank.push(Vec::new());
        }
        if let Some(durations) = by_rank.last_mut() {
            durations.push(event.duration_hours);
        }
    }

    let rank_count = by_rank.iter().map(Vec::len).max().unwrap_or(0);
    let series = (0..rank_count)
        .map(|rank| {
            by_rank
                .iter()
                .map(|durations| durations.get(rank).copied().unwrap_or(0.0))
                .collect()
        })
        .collect();

    StackedSeries { tags, series }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, d)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
    }

    fn event(tag: &str, start: Option<NaiveDateTime>, hours: f64) -> CleanedMaintenanceEvent {
        CleanedMaintenanceEvent {
            tag: tag.to_string(),
            kind: None,
            failure: None,
            description: String::new(),
            start_time: start,
            end_time: None,
            duration_hours: hours,
            duration_clock: String::new(),
            operator: None,
        }
    }

    #[test]
    fn test_empty_batch() {
        let stacked = build_stacked_series(&[]);
        assert!(stacked.tags.is_empty());
        assert!(stacked.series.is_empty());
        assert_eq!(stacked.max_rank(), None);
    }

    #[test]
    fn test_zero_fill_for_shorter_sequences() {
        let events = vec![
            event("B", Some(ts(1)), 1.0),
            event("A", Some(ts(3)), 4.0),
            event("B", Some(ts(2)), 2.0),
        ];
        let stacked = build_stacked_series(&events);

        assert_eq!(stacked.tags, vec!["A", "B"]);
        assert_eq!(stacked.max_rank(), Some(1));
        assert_eq!(stacked.series.len(), 2);
        assert_eq!(stacked.series[0], vec![4.0, 1.0]);
        assert_eq!(stacked.series[1], vec![0.0, 2.0]);
    }

    #[test]
    fn test_ranks_follow_start_time_not_input_order() {
        let events = vec![
            event("P", Some(ts(9)), 9.0),
            event("P", Some(ts(1)), 1.0),
            event("P", Some(ts(5)), 5.0),
        ];
        let stacked = build_stacked_series(&events);
        let ranks: Vec<f64> = stacked.series.iter().map(|s| s[0]).collect();
        assert_eq!(ranks, vec![1.0, 5.0, 9.0]);
    }

    #[test]
    fn test_unknown_start_time_ranks_last() {
        let events = vec![
            event("P", None, 7.0),
            event("P", Some(ts(2)), 2.0),
        ];
        let stacked = build_stacked_series(&events);
        assert_eq!(stacked.series[0], vec![2.0]);
        assert_eq!(stacked.series[1], vec![7.0]);
    }

    #[test]
    fn test_every_series_matches_tag_count() {
        let events = vec![
            event("A", Some(ts(1)), 1.0),
            event("B", Some(ts(1)), 1.0),
            event("B", Some(ts(2)), 1.0),
            event("C", Some(ts(1)), 1.0),
            event("C", Some(ts(2)), 1.0),
            event("C", Some(ts(3)), 1.5),
        ];
        let stacked = build_stacked_series(&events);
        assert_eq!(stacked.series.len(), 3);
        assert!(stacked.series.iter().all(|s| s.len() == stacked.tags.len()));
        assert_eq!(stacked.totals(), vec![1.0, 2.0, 3.5]);
    }
}
