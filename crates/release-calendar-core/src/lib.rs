//! Release Calendar Core Library
//!
//! This library provides the request-handling core for a statistical release
//! calendar page:
//! - Query-parameter validation with per-field errors and usable fallbacks
//! - Two query serializations: the page's own links and the search backend
//! - Pagination windowing and page/offset arithmetic
//! - Publication-state derivation for search results
//!
//! The crate does no I/O of its own; the HTTP layer feeds raw parameters and
//! backend responses in and renders what comes out.

pub mod config;
pub mod error;
pub mod pagination;
pub mod query;
pub mod release;
pub mod util;

pub use config::CalendarConfig;
pub use error::{Error, FieldError, Result};
pub use pagination::{
    PageLink, calculate_offset, calculate_page_number, page_links, total_pages, window,
};
pub use query::{
    DateField, DateGroup, QueryForm, RawQuery, ReleaseType, Sort, UpcomingFilters, ValidatedParams,
};
pub use release::{DateChange, PublicationState, Release, SearchResponse, UpcomingState};

use tracing::debug;

/// Everything the listing page needs to render one request.
#[derive(Debug, Clone)]
pub struct CalendarPage {
    pub params: ValidatedParams,
    /// Field errors collected during validation, for inline display
    pub errors: Vec<FieldError>,
    /// Number of results, capped at the configured reachable maximum
    pub total_results: usize,
    pub total_pages: usize,
    pub page_links: Vec<PageLink>,
    pub entries: Vec<CalendarEntry>,
}

/// One result row with its derived publication state.
#[derive(Debug, Clone)]
pub struct CalendarEntry {
    pub release: Release,
    pub state: PublicationState,
}

impl CalendarPage {
    /// Combine validated parameters and a backend response into the final
    /// page model.
    ///
    /// The number of results is capped at `max_search_results` so the page
    /// links never point past what pagination can reach; if the current page
    /// ends up beyond the (possibly shrunken) result set, the window is
    /// rendered around the last page instead.
    pub fn assemble(
        params: ValidatedParams,
        errors: Vec<FieldError>,
        response: SearchResponse,
        config: &CalendarConfig,
        base_path: &str,
    ) -> Self {
        let total_results = response.number_of_results.min(config.max_search_results);
        let total_pages = pagination::total_pages(total_results, params.limit);
        let current_page = params.page.min(total_pages.max(1));
        let links = pagination::page_links(
            &params,
            current_page,
            total_pages,
            config.window_size,
            base_path,
        );
        debug!(
            "assembled page {} of {} with {} entries",
            current_page,
            total_pages,
            response.releases.len()
        );

        let entries = response
            .releases
            .into_iter()
            .map(|release| {
                let state = release.publication_state();
                CalendarEntry { release, state }
            })
            .collect();

        Self {
            params,
            errors,
            total_results,
            total_pages,
            page_links: links,
            entries,
        }
    }
}

/// Convenience function to validate a raw query in one call
pub fn validate_query(
    query: &RawQuery,
    config: &CalendarConfig,
) -> (ValidatedParams, Vec<FieldError>) {
    ValidatedParams::from_query(query, config)
}
