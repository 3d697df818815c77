//! Query-parameter validation, normalization and serialization.
//!
//! The raw query string comes in as a [`RawQuery`], is validated into a
//! [`ValidatedParams`] (collecting [`FieldError`]s on the way), and goes back
//! out through one of two serializations: the front-end form used for the
//! page's own links, and the backend form used to call the search API.
//!
//! [`FieldError`]: crate::error::FieldError

use std::collections::HashMap;

mod date;
mod form;
mod params;
mod release_type;
mod sort;
pub mod validate;

pub use date::{DateField, DateGroup, ErroredParts, InvalidDate, RawDateParts, ResolvedDate};
pub use form::QueryForm;
pub use params::ValidatedParams;
pub use release_type::{ReleaseType, UpcomingFilters};
pub use sort::Sort;

/// Recognized query-parameter names.
///
/// `query`, `fromDate` and `toDate` are input aliases kept for compatibility
/// with backend-form links; everything else appears in both directions.
pub mod keys {
    pub const LIMIT: &str = "limit";
    pub const PAGE: &str = "page";
    pub const OFFSET: &str = "offset";
    pub const SORT: &str = "sort";
    pub const KEYWORDS: &str = "keywords";
    pub const QUERY: &str = "query";
    pub const RELEASE_TYPE: &str = "release-type";
    pub const CENSUS: &str = "census";
    pub const HIGHLIGHT: &str = "highlight";
    pub const FROM_DATE: &str = "fromDate";
    pub const TO_DATE: &str = "toDate";
    pub const AFTER_DAY: &str = "after-day";
    pub const AFTER_MONTH: &str = "after-month";
    pub const AFTER_YEAR: &str = "after-year";
    pub const BEFORE_DAY: &str = "before-day";
    pub const BEFORE_MONTH: &str = "before-month";
    pub const BEFORE_YEAR: &str = "before-year";
    pub const SUBTYPE_PROVISIONAL: &str = "subtype-provisional";
    pub const SUBTYPE_CONFIRMED: &str = "subtype-confirmed";
    pub const SUBTYPE_POSTPONED: &str = "subtype-postponed";
}

/// Flat string parameters as handed over by the HTTP layer.
///
/// Lookup keeps the first occurrence of a repeated key, matching query-string
/// semantics; unrecognized keys are simply never asked for.
#[derive(Debug, Clone, Default)]
pub struct RawQuery(HashMap<String, String>);

impl RawQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from key/value pairs; the first occurrence of a key wins.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut values = HashMap::new();
        for (key, value) in pairs {
            values.entry(key.into()).or_insert_with(|| value.into());
        }
        Self(values)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// The value for `key`, or the empty string when absent. Validators
    /// treat the two identically.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
