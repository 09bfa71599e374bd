//! Date/time utilities for dirserve.

use std::time::SystemTime;

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;

/// Timestamp format used in directory listings.
///
/// Fixed width and zero padded, so lexicographic order equals chronological
/// order.
pub const LISTING_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Time zone in which listing timestamps are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// Local time zone of the serving process.
    #[default]
    Local,
    /// A named IANA time zone.
    Named(Tz),
}

impl DisplayZone {
    /// Build a zone from a configuration value.
    ///
    /// An empty string selects [`DisplayZone::Local`]; an unknown name falls
    /// back to local time as well.
    pub fn from_config(timezone: &str) -> Self {
        if timezone.is_empty() {
            return DisplayZone::Local;
        }
        match timezone.parse::<Tz>() {
            Ok(tz) => DisplayZone::Named(tz),
            Err(_) => {
                tracing::warn!("Unknown timezone '{}', using local time", timezone);
                DisplayZone::Local
            }
        }
    }

    /// Format a filesystem timestamp in this zone with [`LISTING_FORMAT`].
    pub fn format(&self, time: SystemTime) -> String {
        let utc: DateTime<Utc> = time.into();
        match self {
            DisplayZone::Local => utc.with_timezone(&Local).format(LISTING_FORMAT).to_string(),
            DisplayZone::Named(tz) => utc.with_timezone(tz).format(LISTING_FORMAT).to_string(),
        }
    }
}
