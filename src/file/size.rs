//! Human-readable byte sizes.

/// Units in ascending order. Scaling stops at the last one.
const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count using the largest unit that keeps the value below 1024.
///
/// Values beyond the terabyte range stay in TB, so `1024^5` renders as
/// `"1024.00 TB"`.
pub fn format_size(size_bytes: u64, decimals: usize) -> String {
    let mut value = size_bytes as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.decimals$} {}", UNITS[unit])
}

/// Format a byte count with two decimal places.
pub fn human_readable_size(size_bytes: u64) -> String {
    format_size(size_bytes, 2)
}
