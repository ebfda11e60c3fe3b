//! services/dashboard/src/web/format.rs
//!
//! Display formatting for timestamps and byte counts.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Renders a server timestamp as `"Jan 5, 2024, 09:30 AM"`.
///
/// Timestamps carrying an offset are shown in local time, naive ones as
/// written. Anything unparseable renders as `"Invalid Date"`.
pub fn format_date(value: &str) -> String {
    match parse_timestamp(value.trim()) {
        Some(dt) => dt.format("%b %-d, %Y, %I:%M %p").to_string(),
        None => "Invalid Date".to_string(),
    }
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = value.replacen(' ', "T", 1).parse::<NaiveDateTime>() {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// `0 -> "0 Bytes"`, `1536 -> "1.5 KB"`; two decimals at most, GB at most.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut divisor = 1u64;
    while unit + 1 < SIZE_UNITS.len() && bytes >= divisor * 1024 {
        divisor *= 1024;
        unit += 1;
    }

    let scaled = (bytes as f64 / divisor as f64 * 100.0).round() / 100.0;
    format!("{} {}", scaled, SIZE_UNITS[unit])
}
