//! Listing order.

use std::cmp::Ordering;
use std::fmt;

use super::entry::DirectoryEntry;

/// Column a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Case-insensitive name.
    Name,
    /// Raw size in bytes.
    Size,
    /// Creation timestamp.
    CreationTime,
    /// Modification timestamp.
    ModificationTime,
    /// Case-insensitive type label.
    Type,
}

impl SortKey {
    /// Parse a `sort_by` query value. Unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(SortKey::Name),
            "size" => Some(SortKey::Size),
            "creation_time" => Some(SortKey::CreationTime),
            "modification_time" => Some(SortKey::ModificationTime),
            "type" => Some(SortKey::Type),
            _ => None,
        }
    }

    /// Query parameter form of this key.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Size => "size",
            SortKey::CreationTime => "creation_time",
            SortKey::ModificationTime => "modification_time",
            SortKey::Type => "type",
        }
    }

    fn compare(&self, a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
        match self {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Size => a.size_bytes.cmp(&b.size_bytes),
            SortKey::CreationTime => a.created_at.cmp(&b.created_at),
            SortKey::ModificationTime => a.modified_at.cmp(&b.modified_at),
            SortKey::Type => a
                .kind
                .label()
                .to_lowercase()
                .cmp(&b.kind.label().to_lowercase()),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Parse an `order` query value. Anything but `"desc"` is ascending.
    pub fn from_param(s: &str) -> Self {
        if s == "desc" {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    /// The opposite direction.
    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// Query parameter form of this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort entries in place.
///
/// The sort is stable in both directions: entries that compare equal keep
/// their relative order. `None` leaves the slice untouched.
pub fn sort_entries(entries: &mut [DirectoryEntry], key: Option<SortKey>, order: SortOrder) {
    let Some(key) = key else {
        return;
    };

    match order {
        SortOrder::Asc => entries.sort_by(|a, b| key.compare(a, b)),
        SortOrder::Desc => entries.sort_by(|a, b| key.compare(b, a)),
    }
}
