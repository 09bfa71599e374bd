//! Directory listing.

use std::fs;
use std::path::Path;

use super::entry::DirectoryEntry;
use crate::datetime::DisplayZone;
use crate::{FileBrowserError, Result};

/// List the immediate children of `folder`.
///
/// Only regular files and directories are returned (symlinks are followed).
/// Children are visited in byte order of their names; callers sort the result
/// themselves. A child whose stat fails after enumeration, for instance
/// because it was deleted mid-listing, is skipped rather than failing the
/// whole listing.
///
/// Fails with [`FileBrowserError::NotFound`] when the folder itself cannot be
/// enumerated.
pub fn list_directory(folder: &Path, zone: DisplayZone) -> Result<Vec<DirectoryEntry>> {
    let read_dir = fs::read_dir(folder).map_err(|e| {
        tracing::debug!("Cannot enumerate {}: {}", folder.display(), e);
        FileBrowserError::NotFound(format!("Folder: {}", folder.display()))
    })?;

    let mut names: Vec<_> = read_dir
        .filter_map(|entry| entry.ok().map(|e| e.file_name()))
        .collect();
    names.sort();

    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        let path = folder.join(&name);
        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        if !metadata.is_file() && !metadata.is_dir() {
            continue;
        }

        entries.push(DirectoryEntry::from_metadata(
            name.to_string_lossy().into_owned(),
            &metadata,
            zone,
        ));
    }

    Ok(entries)
}
