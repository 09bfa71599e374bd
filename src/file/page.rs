//! Listing pagination.

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Entries on this page.
    pub entries: Vec<T>,
    /// Requested page number (1-based).
    pub page: i64,
    /// Total number of pages; 0 for an empty listing.
    pub total_pages: u64,
}

/// Cut page `page` (1-based) out of `entries`.
///
/// Out-of-range page numbers, including zero and negatives, give an empty
/// page rather than an error.
pub fn paginate<T>(entries: Vec<T>, page: i64, page_size: usize) -> Page<T> {
    let len = entries.len();
    let total_pages = if page_size == 0 {
        0
    } else {
        len.div_ceil(page_size) as u64
    };

    let entries = match usize::try_from(page.saturating_sub(1)) {
        Ok(index) if page >= 1 => {
            let start = index.saturating_mul(page_size).min(len);
            let end = start.saturating_add(page_size).min(len);
            entries.into_iter().skip(start).take(end - start).collect()
        }
        _ => Vec::new(),
    };

    Page {
        entries,
        page,
        total_pages,
    }
}
