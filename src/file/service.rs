//! File browsing service for dirserve.
//!
//! This module ties the building blocks together into the three operations
//! the web layer exposes:
//! - Listing a folder (resolve, list, sort, paginate)
//! - Locating a file for download
//! - Writing an upload under a collision-free name

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::entry::DirectoryEntry;
use super::listing::list_directory;
use super::page::paginate;
use super::resolve::ServedRoot;
use super::sort::{sort_entries, SortKey, SortOrder};
use super::unique::{create_unique, sanitize_filename};
use super::DEFAULT_PAGE_SIZE;
use crate::datetime::DisplayZone;
use crate::{FileBrowserError, Result};

/// Prefix of in-progress upload files.
const UPLOAD_TEMP_PREFIX: &str = ".upload-";

/// Request data for a folder listing.
#[derive(Debug, Clone)]
pub struct ListingRequest {
    /// Folder subpath beneath the root.
    pub folder: String,
    /// Sort key as received (`name`, `size`, ...).
    pub sort_by: String,
    /// Sort direction as received (`asc` or `desc`).
    pub order: String,
    /// Page number (1-based).
    pub page: i64,
}

impl ListingRequest {
    /// Create a request for the first page, sorted by name ascending.
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            sort_by: "name".to_string(),
            order: "asc".to_string(),
            page: 1,
        }
    }

    /// Set the sort key and direction.
    pub fn with_sort(mut self, sort_by: impl Into<String>, order: impl Into<String>) -> Self {
        self.sort_by = sort_by.into();
        self.order = order.into();
        self
    }

    /// Set the page number.
    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }
}

/// One page of a folder listing.
#[derive(Debug, Clone)]
pub struct Listing {
    /// Folder subpath, `/`-separated ("" for the root).
    pub path: String,
    /// Entries on this page.
    pub entries: Vec<DirectoryEntry>,
    /// Page number.
    pub page: i64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Sort key as requested.
    pub sort_by: String,
    /// Effective sort direction.
    pub order: SortOrder,
}

/// A completed upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Absolute path of the stored file.
    pub path: PathBuf,
    /// Stored file name (may differ from the requested one).
    pub name: String,
    /// Subpath of the stored file beneath the root.
    pub relative_path: String,
    /// Bytes written.
    pub size: u64,
}

/// An upload being written to a temporary file in its destination folder.
///
/// Nothing appears under the final name until [`PendingUpload::finish`]
/// succeeds. Dropping a pending upload removes the temporary file.
#[derive(Debug)]
pub struct PendingUpload {
    folder: PathBuf,
    filename: String,
    temp: NamedTempFile,
    written: u64,
    max_size: u64,
}

impl PendingUpload {
    /// Append a chunk of the body.
    pub fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.written += chunk.len() as u64;
        if self.written > self.max_size {
            return Err(FileBrowserError::TooLarge(self.max_size));
        }
        self.temp.write_all(chunk)?;
        Ok(())
    }

    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Move the body under a collision-free name in the destination folder.
    ///
    /// The final name is claimed with an exclusive create and then replaced
    /// by the temporary file in one rename.
    fn finish(mut self, root: &ServedRoot) -> Result<UploadedFile> {
        self.temp.flush()?;

        let (target, placeholder) = create_unique(&self.folder, &self.filename)?;
        drop(placeholder);

        if let Err(e) = self.temp.persist(&target) {
            let _ = fs::remove_file(&target);
            return Err(e.error.into());
        }

        Ok(UploadedFile {
            name: file_name(&target),
            relative_path: root.relative(&target),
            path: target,
            size: self.written,
        })
    }
}

/// File browsing service over one served root.
#[derive(Debug, Clone)]
pub struct FileBrowser {
    root: ServedRoot,
    page_size: usize,
    zone: DisplayZone,
    max_upload_size: u64,
}

impl FileBrowser {
    /// Create a new FileBrowser with default page size and no upload limit.
    pub fn new(root: ServedRoot) -> Self {
        Self {
            root,
            page_size: DEFAULT_PAGE_SIZE,
            zone: DisplayZone::Local,
            max_upload_size: u64::MAX,
        }
    }

    /// Set the number of entries per page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the time zone for listing timestamps.
    pub fn with_zone(mut self, zone: DisplayZone) -> Self {
        self.zone = zone;
        self
    }

    /// Set the maximum upload size in bytes.
    pub fn with_max_upload_size(mut self, max_size: u64) -> Self {
        self.max_upload_size = max_size;
        self
    }

    /// The served root.
    pub fn root(&self) -> &ServedRoot {
        &self.root
    }

    /// Number of entries per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Maximum upload size in bytes.
    pub fn max_upload_size(&self) -> u64 {
        self.max_upload_size
    }

    /// List one page of a folder.
    ///
    /// An unknown sort key keeps the enumeration order; a file path or a path
    /// outside the root fails like a missing folder.
    pub fn list(&self, request: &ListingRequest) -> Result<Listing> {
        let folder = self.root.resolve(&request.folder)?;
        let mut entries = list_directory(&folder, self.zone)?;

        let order = SortOrder::from_param(&request.order);
        sort_entries(&mut entries, SortKey::parse(&request.sort_by), order);

        let page = paginate(entries, request.page, self.page_size);

        Ok(Listing {
            path: self.root.relative(&folder),
            entries: page.entries,
            page: page.page,
            total_pages: page.total_pages,
            sort_by: request.sort_by.clone(),
            order,
        })
    }

    /// Locate a regular file for download.
    pub fn resolve_file(&self, subpath: &str) -> Result<PathBuf> {
        let path = self.root.resolve(subpath)?;
        if path.is_file() {
            Ok(path)
        } else {
            Err(FileBrowserError::NotFound(format!("File: {subpath}")))
        }
    }

    /// Start an upload of `filename` into folder `subpath`.
    ///
    /// The folder is created when missing. The client file name is reduced to
    /// a bare base name first.
    pub fn begin_upload(&self, subpath: &str, filename: &str) -> Result<PendingUpload> {
        let filename = sanitize_filename(filename)
            .ok_or_else(|| FileBrowserError::Validation("No file name provided".to_string()))?;
        let folder = self.root.resolve_or_create_dir(subpath)?;

        let temp = tempfile::Builder::new()
            .prefix(UPLOAD_TEMP_PREFIX)
            .tempfile_in(&folder)?;

        Ok(PendingUpload {
            folder,
            filename,
            temp,
            written: 0,
            max_size: self.max_upload_size,
        })
    }

    /// Complete an upload started with [`FileBrowser::begin_upload`].
    pub fn finish_upload(&self, pending: PendingUpload) -> Result<UploadedFile> {
        let uploaded = pending.finish(&self.root)?;
        tracing::info!(
            path = %uploaded.relative_path,
            size = uploaded.size,
            "Stored upload"
        );
        Ok(uploaded)
    }

    /// Upload an in-memory body in one call.
    pub fn upload(&self, subpath: &str, filename: &str, content: &[u8]) -> Result<UploadedFile> {
        let mut pending = self.begin_upload(subpath, filename)?;
        pending.write_chunk(content)?;
        self.finish_upload(pending)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
