use chrono::{DateTime, Datelike, Utc};

pub fn day_key(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

/// ISO year and zero-padded ISO week, e.g. `2021-01` for 2021-01-04 and
/// `2020-53` for 2021-01-01.
pub fn week_key(timestamp: &DateTime<Utc>) -> String {
    let iso = timestamp.iso_week();
    format!("{}-{:02}", iso.year(), iso.week())
}

pub fn month_key(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m").to_string()
}

/// Splits a comma separated language list, dropping empty items.
pub fn parse_language_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
