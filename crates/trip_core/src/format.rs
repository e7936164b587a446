//! Text formatting for dates, times and durations shown in point rows and forms.
//!
//! All values are rendered in UTC.

use chrono::{DateTime, Datelike, Duration, Utc};

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

/// `"JUL 10"`
pub fn format_day_label(date: DateTime<Utc>) -> String {
    format!(
        "{} {}",
        date.format("%b").to_string().to_uppercase(),
        date.day()
    )
}

/// `"22:55"`
pub fn format_time(date: DateTime<Utc>) -> String {
    date.format("%H:%M").to_string()
}

/// Machine-readable `datetime` attribute: `"2019-07-10"` or `"2019-07-10T22:55"`.
pub fn format_iso(date: DateTime<Utc>, with_time: bool) -> String {
    if with_time {
        date.format("%Y-%m-%dT%H:%M").to_string()
    } else {
        date.format("%Y-%m-%d").to_string()
    }
}

/// Edit form timestamp: `"10/07/19 22:55"`.
pub fn format_form_datetime(date: DateTime<Utc>) -> String {
    date.format("%d/%m/%y %H:%M").to_string()
}

/// `"05M"`, `"02H 30M"` or `"01D 02H 30M"`.
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    if minutes < MINUTES_PER_HOUR {
        format!("{minutes:02}M")
    } else if minutes < MINUTES_PER_DAY {
        format!(
            "{:02}H {:02}M",
            minutes / MINUTES_PER_HOUR,
            minutes % MINUTES_PER_HOUR
        )
    } else {
        format!(
            "{:02}D {:02}H {:02}M",
            minutes / MINUTES_PER_DAY,
            (minutes % MINUTES_PER_DAY) / MINUTES_PER_HOUR,
            minutes % MINUTES_PER_HOUR
        )
    }
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
