//! Pagination arithmetic and page-link construction.
//!
//! Pages are 1-based throughout; offsets are 0-based and only appear at the
//! search-backend boundary. The window functions are pure arithmetic over
//! numbers the caller has already validated, and treat broken preconditions
//! as programming errors rather than user input.

use crate::query::{ValidatedParams, keys};

/// One rendered pagination control: a page number and the URL that reaches
/// it with every other parameter preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub page: usize,
    pub url: String,
}

/// Inclusive range of page numbers to render around the current page.
///
/// The window sticks to the start and end of the page range rather than
/// shrinking, so it always spans `min(window_size, total_pages)` pages. Even
/// sizes sit the current page left of centre. A window of exactly one is a
/// "next page" control: it shows the page after the current one, wrapping
/// back to the first page from the last.
///
/// # Panics
///
/// Panics when any argument is zero or when `current_page` is beyond
/// `total_pages`; callers validate and clamp first.
pub fn window(current_page: usize, total_pages: usize, window_size: usize) -> (usize, usize) {
    assert!(
        current_page >= 1 && total_pages >= 1 && window_size >= 1,
        "window arguments must all be at least 1 \
         (current {current_page}, total {total_pages}, size {window_size})"
    );
    assert!(
        current_page <= total_pages,
        "current page {current_page} is beyond the last page {total_pages}"
    );

    if window_size == 1 {
        let next = (current_page % total_pages) + 1;
        return (next, next);
    }
    if window_size >= total_pages {
        return (1, total_pages);
    }

    let before_current = if window_size % 2 == 0 {
        window_size / 2 - 1
    } else {
        window_size / 2
    };
    let last_start = total_pages - window_size + 1;
    let start = current_page.saturating_sub(before_current).clamp(1, last_start);
    let end = start + window_size - 1;
    (start, end)
}

/// 0-based result offset of the first entry on a 1-based page.
pub const fn calculate_offset(page_number: usize, page_size: usize) -> usize {
    if page_number == 0 || page_size == 0 {
        return 0;
    }
    (page_number - 1) * page_size
}

/// 1-based page number containing a 0-based result offset.
pub const fn calculate_page_number(offset: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    offset / page_size + 1
}

/// Number of pages needed to show `total_results` at `limit` per page.
pub const fn total_pages(total_results: usize, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }
    total_results.div_ceil(limit)
}

/// Build the clickable page links for the visible window.
///
/// Each link re-encodes the validated parameters with only the page number
/// swapped, so filters, sort and keywords survive navigation. Returns an
/// empty list when there are no pages at all. `current_page` must already be
/// clamped to `total_pages` by the caller.
pub fn page_links(
    params: &ValidatedParams,
    current_page: usize,
    total_pages: usize,
    window_size: usize,
    base_path: &str,
) -> Vec<PageLink> {
    if total_pages == 0 {
        return Vec::new();
    }
    let (start, end) = window(current_page, total_pages, window_size);
    (start..=end)
        .map(|page| {
            let mut form = params.as_frontend_query();
            form.set(keys::PAGE, page.to_string());
            PageLink {
                page,
                url: format!("{base_path}?{}", form.encode()),
            }
        })
        .collect()
}
