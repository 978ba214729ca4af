//! Clock-string duration codec
//!
//! Maintenance durations arrive from the store as `H:MM:SS` text rather than
//! a numeric type. Charts want fractional hours, tooltips want `HH:MM`.

const SECONDS_PER_HOUR: u64 = 3600;
const SECONDS_PER_MINUTE: u64 = 60;

/// Display value for an event whose duration was never recorded
pub const EMPTY_CLOCK: &str = "00:00:00";

/// Display value for negative or undefined hour values
const ZERO_HOURS_MINUTES: &str = "00:00";

/// Convert a clock string (`H:M:S`) to fractional hours.
///
/// Each component must be an unsigned run of ASCII digits; width is not
/// checked, so `"100:5:7"` is accepted. Anything else (absent value, wrong
/// number of components, signs, whitespace, non-digits) yields `0.0`.
/// The result is never negative and this function never fails.
///
/// # Examples
///
/// ```
/// use mesalpha_common::human_time::clock_to_hours;
///
/// assert_eq!(clock_to_hours(Some("2:30:00")), 2.5);
/// assert_eq!(clock_to_hours(Some("00:00:36")), 0.01);
/// assert_eq!(clock_to_hours(Some("2:30")), 0.0);
/// assert_eq!(clock_to_hours(None), 0.0);
/// ```
pub fn clock_to_hours(value: Option<&str>) -> f64 {
    value.and_then(parse_clock).unwrap_or(0.0)
}

/// Strict form of [`clock_to_hours`]: `None` when `value` is malformed.
pub fn parse_clock(value: &str) -> Option<f64> {
    let mut parts = value.split(':');
    let hours = parse_component(parts.next()?)?;
    let minutes = parse_component(parts.next()?)?;
    let seconds = parse_component(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }

    Some(hours as f64 + minutes as f64 / 60.0 + seconds as f64 / SECONDS_PER_HOUR as f64)
}

fn parse_component(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Format fractional hours as zero-padded `HH:MM`.
///
/// Seconds are truncated, not rounded. Negative, NaN and infinite inputs
/// render as `"00:00"`. Hours wider than two digits are not clipped.
///
/// # Examples
///
/// ```
/// use mesalpha_common::human_time::hours_to_clock;
///
/// assert_eq!(hours_to_clock(1.5), "01:30");
/// assert_eq!(hours_to_clock(-1.0), "00:00");
/// assert_eq!(hours_to_clock(f64::NAN), "00:00");
/// ```
pub fn hours_to_clock(hours: f64) -> String {
    if !hours.is_finite() || hours < 0.0 {
        return ZERO_HOURS_MINUTES.to_string();
    }

    // Settle float error at millisecond precision, then drop sub-second part
    let total_millis = (hours * SECONDS_PER_HOUR as f64 * 1000.0).round() as u64;
    let total_seconds = total_millis / 1000;
    let hours_part = total_seconds / SECONDS_PER_HOUR;
    let minutes_part = (total_seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    format!("{:02}:{:02}", hours_part, minutes_part)
}
