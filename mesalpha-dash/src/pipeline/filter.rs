//! Year/month filter shared by every production query of one interaction

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use mesalpha_common::db::{FareloSample, ProductionSample};
use mesalpha_common::{Error, Result};
use serde::{Serialize, Serializer};

/// Selector value meaning "no restriction" (the UI also sends "Todos")
const ALL: &str = "all";
const ALL_PT: &str = "Todos";

/// Anything that belongs to a calendar date
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for ProductionSample {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for FareloSample {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MonthFilter {
    #[default]
    All,
    /// Calendar month, 1-12
    Month(u32),
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::All => f.write_str(ALL),
            YearFilter::Year(year) => write!(f, "{:04}", year),
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str(ALL),
            MonthFilter::Month(month) => write!(f, "{:02}", month),
        }
    }
}

impl Serialize for YearFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for MonthFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Immutable (year, month) filter.
///
/// Built once per user interaction and passed by value to every query in
/// it, so series fetched independently (output volume, meal moisture)
/// always describe the same time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct FilterContext {
    year: YearFilter,
    month: MonthFilter,
}

impl FilterContext {
    /// No restriction on either field
    pub const ALL: FilterContext = FilterContext {
        year: YearFilter::All,
        month: MonthFilter::All,
    };

    pub fn new(year: YearFilter, month: MonthFilter) -> Self {
        Self { year, month }
    }

    /// Build from selector strings.
    ///
    /// `None`, empty, `"all"` and `"Todos"` mean no restriction. A year must
    /// be a positive integer of at most four digits; a month must be 1-12
    /// written with one or two digits (`"2"` and `"02"` are equivalent).
    pub fn parse(year: Option<&str>, month: Option<&str>) -> Result<Self> {
        Ok(Self {
            year: parse_year(year)?,
            month: parse_month(month)?,
        })
    }

    pub fn year(&self) -> YearFilter {
        self.year
    }

    pub fn month(&self) -> MonthFilter {
        self.month
    }

    pub fn is_unfiltered(&self) -> bool {
        *self == Self::ALL
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        let year_ok = match self.year {
            YearFilter::All => true,
            YearFilter::Year(year) => date.year() == year,
        };
        let month_ok = match self.month {
            MonthFilter::All => true,
            MonthFilter::Month(month) => date.month() == month,
        };
        year_ok && month_ok
    }

    /// Keep only the samples inside the filter window
    pub fn apply<T: Dated>(&self, samples: Vec<T>) -> Vec<T> {
        if self.is_unfiltered() {
            return samples;
        }
        samples
            .into_iter()
            .filter(|sample| self.matches(sample.date()))
            .collect()
    }
}

impl fmt::Display for FilterContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "year={} month={}", self.year, self.month)
    }
}

fn is_all(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None => true,
        Some(v) => v.is_empty() || v.eq_ignore_ascii_case(ALL) || v.eq_ignore_ascii_case(ALL_PT),
    }
}

fn digits(value: &str, max_len: usize) -> Option<u32> {
    if value.is_empty() || value.len() > max_len || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

fn parse_year(value: Option<&str>) -> Result<YearFilter> {
    if is_all(value) {
        return Ok(YearFilter::All);
    }
    let raw = value.unwrap_or_default().trim();
    match digits(raw, 4) {
        Some(year) if year > 0 => Ok(YearFilter::Year(year as i32)),
        _ => Err(Error::InvalidInput(format!("Invalid year filter: {}", raw))),
    }
}

fn parse_month(value: Option<&str>) -> Result<MonthFilter> {
    if is_all(value) {
        return Ok(MonthFilter::All);
    }
    let raw = value.unwrap_or_default().trim();
    match digits(raw, 2) {
        Some(month) if (1..=12).contains(&month) => Ok(MonthFilter::Month(month)),
        _ => Err(Error::InvalidInput(format!("Invalid month filter: {}", raw))),
    }
}

/// Values for the year/month selectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Years that actually have production samples, ascending
    pub years: Vec<i32>,
    /// Always `"01"` through `"12"`
    pub months: Vec<String>,
}

impl FilterOptions {
    pub fn from_samples<T: Dated>(samples: &[T]) -> Self {
        let years: BTreeSet<i32> = samples.iter().map(|s| s.date().year()).collect();
        Self {
            years: years.into_iter().collect(),
            months: (1..=12).map(|m| format!("{:02}", m)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_all_spellings_parse_to_unfiltered() {
        for value in [None, Some(""), Some("all"), Some("ALL"), Some("Todos"), Some("  todos ")] {
            let filter = FilterContext::parse(value, value).unwrap();
            assert!(filter.is_unfiltered(), "value {:?}", value);
        }
    }

    #[test]
    fn test_concrete_values() {
        let filter = FilterContext::parse(Some("2024"), Some("02")).unwrap();
        assert_eq!(filter.year(), YearFilter::Year(2024));
        assert_eq!(filter.month(), MonthFilter::Month(2));

        let single_digit = FilterContext::parse(Some("2024"), Some("2")).unwrap();
        assert_eq!(single_digit, filter);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(FilterContext::parse(Some("20x4"), None).is_err());
        assert!(FilterContext::parse(Some("-2024"), None).is_err());
        assert!(FilterContext::parse(Some("0"), None).is_err());
        assert!(FilterContext::parse(Some("20245"), None).is_err());
        assert!(FilterContext::parse(None, Some("13")).is_err());
        assert!(FilterContext::parse(None, Some("00")).is_err());
        assert!(FilterContext::parse(None, Some("003")).is_err());
        assert!(FilterContext::parse(None, Some("Fev")).is_err());
    }

    #[test]
    fn test_matches() {
        let all = FilterContext::ALL;
        assert!(all.matches(date(1999, 12, 31)));

        let year_only = FilterContext::new(YearFilter::Year(2024), MonthFilter::All);
        assert!(year_only.matches(date(2024, 7, 1)));
        assert!(!year_only.matches(date(2023, 7, 1)));

        let month_only = FilterContext::new(YearFilter::All, MonthFilter::Month(2));
        assert!(month_only.matches(date(2020, 2, 29)));
        assert!(month_only.matches(date(2024, 2, 1)));
        assert!(!month_only.matches(date(2024, 3, 1)));

        let both = FilterContext::new(YearFilter::Year(2024), MonthFilter::Month(2));
        assert!(both.matches(date(2024, 2, 1)));
        assert!(!both.matches(date(2023, 2, 1)));
        assert!(!both.matches(date(2024, 1, 31)));
    }

    #[test]
    fn test_display_and_serialize() {
        let filter = FilterContext::new(YearFilter::Year(2024), MonthFilter::Month(3));
        assert_eq!(filter.to_string(), "year=2024 month=03");

        let json = serde_json::to_value(filter).unwrap();
        assert_eq!(json["year"], "2024");
        assert_eq!(json["month"], "03");

        let json = serde_json::to_value(FilterContext::ALL).unwrap();
        assert_eq!(json["year"], "all");
        assert_eq!(json["month"], "all");
    }

    #[test]
    fn test_filter_options() {
        let samples = vec![
            FareloSample { date: date(2023, 5, 1), moisture_pct: 12.0, protein_pct: 46.0, fat_pct: 2.0 },
            FareloSample { date: date(2021, 1, 1), moisture_pct: 12.0, protein_pct: 46.0, fat_pct: 2.0 },
            FareloSample { date: date(2023, 6, 1), moisture_pct: 12.0, protein_pct: 46.0, fat_pct: 2.0 },
        ];
        let options = FilterOptions::from_samples(&samples);
        assert_eq!(options.years, vec![2021, 2023]);
        assert_eq!(options.months.len(), 12);
        assert_eq!(options.months.first().map(String::as_str), Some("01"));
        assert_eq!(options.months.last().map(String::as_str), Some("12"));

        let empty: Vec<FareloSample> = Vec::new();
        assert!(FilterOptions::from_samples(&empty).years.is_empty());
    }
}
