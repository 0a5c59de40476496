//! Clock helpers

use chrono::{DateTime, Local, Utc};

/// Current Unix timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Today's local date as `YYYY-MM-DD`, the stored receipt date format
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Local timestamp for export file names: `YYYYmmdd_HHMMSS`
pub fn file_stamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Millisecond timestamp as a local `DD/MM/YYYY HH:MM`, for listings
pub fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_default()
}
