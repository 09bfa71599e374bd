//! Directory entry types and classification.

use std::fmt;
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::SystemTime;

use serde::{Serialize, Serializer};
use utoipa::ToSchema;

use super::size::human_readable_size;
use crate::datetime::DisplayZone;

/// Type label of a listed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory.
    Directory,
    /// A file with an extension, stored with its leading dot (e.g. ".txt").
    Extension(String),
    /// A file without an extension.
    File,
}

impl EntryKind {
    /// Classify a name given whether it refers to a directory.
    pub fn for_name(name: &str, is_dir: bool) -> Self {
        if is_dir {
            return EntryKind::Directory;
        }
        match split_extension(name).1 {
            "" => EntryKind::File,
            ext => EntryKind::Extension(ext.to_string()),
        }
    }

    /// Display label: "Directory", the extension, or "File".
    pub fn label(&self) -> &str {
        match self {
            EntryKind::Directory => "Directory",
            EntryKind::Extension(ext) => ext,
            EntryKind::File => "File",
        }
    }

    /// Whether this is [`EntryKind::Directory`].
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for EntryKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Split a file name into stem and extension.
///
/// The extension starts at the last `.` and keeps it. Leading dots belong to
/// the stem, so `.bashrc` has no extension and `archive.tar.gz` splits into
/// `("archive.tar", ".gz")`.
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(idx) => name.split_at(leading_dots + idx),
        None => (name, ""),
    }
}

/// Classify the entry at `path`.
///
/// Stats the path (following symlinks). A path that vanished surfaces the raw
/// I/O error.
pub fn classify(path: &Path) -> io::Result<EntryKind> {
    let metadata = fs::metadata(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    Ok(EntryKind::for_name(&name, metadata.is_dir()))
}

/// One immediate child of a listed folder.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DirectoryEntry {
    /// Base name.
    pub name: String,
    /// Raw size in bytes (0 for directories).
    pub size_bytes: u64,
    /// Size rendered for display (e.g. "1.50 KB").
    pub size_display: String,
    /// Creation timestamp (`YYYY-MM-DD HH:MM:SS`).
    pub created_at: String,
    /// Modification timestamp (`YYYY-MM-DD HH:MM:SS`).
    pub modified_at: String,
    /// "Directory", the extension including its dot, or "File".
    #[schema(value_type = String, example = ".txt")]
    pub kind: EntryKind,
}

impl DirectoryEntry {
    /// Build an entry from already-fetched metadata.
    pub fn from_metadata(name: String, metadata: &Metadata, zone: DisplayZone) -> Self {
        let kind = EntryKind::for_name(&name, metadata.is_dir());
        let size_bytes = if kind.is_dir() { 0 } else { metadata.len() };
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        Self {
            name,
            size_bytes,
            size_display: human_readable_size(size_bytes),
            created_at: zone.format(creation_time(metadata).unwrap_or(modified)),
            modified_at: zone.format(modified),
            kind,
        }
    }
}

/// Inode change time, which is what unix reports in place of a creation time.
#[cfg(unix)]
fn creation_time(metadata: &Metadata) -> Option<SystemTime> {
    use std::os::unix::fs::MetadataExt;
    use std::time::Duration;

    let secs = u64::try_from(metadata.ctime()).ok()?;
    let nanos = u32::try_from(metadata.ctime_nsec()).unwrap_or(0);
    SystemTime::UNIX_EPOCH.checked_add(Duration::new(secs, nanos))
}

#[cfg(not(unix))]
fn creation_time(metadata: &Metadata) -> Option<SystemTime> {
    metadata.created().ok()
}
