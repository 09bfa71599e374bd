//! File browsing module for dirserve.
//!
//! This module implements everything that touches the served tree:
//! - Safe resolution of client subpaths beneath the served root
//! - Directory listing with per-entry metadata
//! - Sorting and pagination of listings
//! - Collision-free naming for uploads

mod entry;
mod listing;
mod page;
mod resolve;
mod service;
mod size;
mod sort;
mod unique;

pub use entry::{classify, split_extension, DirectoryEntry, EntryKind};
pub use listing::list_directory;
pub use page::{paginate, Page};
pub use resolve::ServedRoot;
pub use service::{FileBrowser, Listing, ListingRequest, PendingUpload, UploadedFile};
pub use size::{format_size, human_readable_size};
pub use sort::{sort_entries, SortKey, SortOrder};
pub use unique::{create_unique, reserve, sanitize_filename};

/// Default number of entries per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 100;
