use tracing::{debug, warn};

use super::date::{DateField, DateGroup, RawDateParts};
use super::form::QueryForm;
use super::release_type::{ReleaseType, UpcomingFilters};
use super::sort::Sort;
use super::{RawQuery, keys, validate};
use crate::config::CalendarConfig;
use crate::error::FieldError;
use crate::pagination;

/// The validated, normalized state of one listing-page request.
///
/// Built once per request by [`ValidatedParams::from_query`] and read-only
/// afterwards; everything downstream (page links, the backend request, form
/// re-display) is derived from this value rather than from the raw query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedParams {
    /// Results per page
    pub limit: usize,
    /// Current page, 1-based
    pub page: usize,
    /// 0-based result offset implied by `page` and `limit`
    pub offset: usize,
    /// Start of the release-date range
    pub after_date: DateField,
    /// End of the release-date range
    pub before_date: DateField,
    /// Free-text search terms, trimmed
    pub keywords: String,
    pub sort: Sort,
    pub release_type: ReleaseType,
    /// Refinements of the upcoming view; cleared for the other types
    pub upcoming_filters: UpcomingFilters,
    /// Restrict results to census-related releases
    pub census: bool,
    /// Ask the backend to highlight keyword matches
    pub highlight: bool,
}

impl ValidatedParams {
    /// Validate a raw query against the configuration.
    ///
    /// Never fails: every rejected field falls back to its default and is
    /// reported in the returned list, so one bad parameter cannot take the
    /// page down. The `limit` is validated first because the page bound
    /// depends on it.
    pub fn from_query(query: &RawQuery, config: &CalendarConfig) -> (Self, Vec<FieldError>) {
        let mut errors = Vec::new();
        let push = |errors: &mut Vec<FieldError>, error: Option<FieldError>| {
            if let Some(error) = error {
                errors.push(error);
            }
        };

        let (limit, error) = validate::bounded_int(
            query.value(keys::LIMIT),
            keys::LIMIT,
            0,
            config.max_limit,
            config.default_limit,
        );
        push(&mut errors, error);

        // an explicit page wins; otherwise a backend-style offset maps back
        // onto the page containing it
        let max_page = config.max_page(limit);
        let page_raw = query.value(keys::PAGE).trim();
        let offset_raw = query.value(keys::OFFSET).trim();
        let (page, error) = if page_raw.is_empty() && !offset_raw.is_empty() {
            let max_offset = pagination::calculate_offset(max_page, limit);
            let (offset, error) =
                validate::bounded_int(offset_raw, keys::OFFSET, 0, max_offset, 0);
            (pagination::calculate_page_number(offset, limit), error)
        } else {
            validate::bounded_int(page_raw, keys::PAGE, 1, max_page, 1)
        };
        push(&mut errors, error);

        let mut keywords = query.value(keys::KEYWORDS).trim();
        if keywords.is_empty() {
            keywords = query.value(keys::QUERY).trim();
        }
        let keywords = keywords.to_owned();

        let (mut sort, error) =
            validate::sort(query.value(keys::SORT), keys::SORT, config.default_sort);
        push(&mut errors, error);
        if sort == Sort::Relevance && keywords.is_empty() {
            // relevance needs something to be relevant to
            debug!("no keywords supplied, replacing relevance sort with {}", config.default_sort);
            sort = config.default_sort;
        }

        let (release_type, error) = validate::release_type(
            query.value(keys::RELEASE_TYPE),
            keys::RELEASE_TYPE,
            config.default_release_type,
        );
        push(&mut errors, error);

        let upcoming_filters = if release_type == ReleaseType::Upcoming {
            let (provisional, error) = validate::boolean(
                query.value(keys::SUBTYPE_PROVISIONAL),
                keys::SUBTYPE_PROVISIONAL,
                false,
            );
            push(&mut errors, error);
            let (confirmed, error) = validate::boolean(
                query.value(keys::SUBTYPE_CONFIRMED),
                keys::SUBTYPE_CONFIRMED,
                false,
            );
            push(&mut errors, error);
            let (postponed, error) = validate::boolean(
                query.value(keys::SUBTYPE_POSTPONED),
                keys::SUBTYPE_POSTPONED,
                false,
            );
            push(&mut errors, error);
            UpcomingFilters {
                provisional,
                confirmed,
                postponed,
            }
        } else {
            UpcomingFilters::default()
        };

        let (after_date, date_errors) = Self::date_from_query(query, DateGroup::After);
        errors.extend(date_errors);
        let (before_date, date_errors) = Self::date_from_query(query, DateGroup::Before);
        errors.extend(date_errors);
        push(&mut errors, validate::date_range(&after_date, &before_date));

        let (census, error) = validate::boolean(query.value(keys::CENSUS), keys::CENSUS, false);
        push(&mut errors, error);
        let (highlight, error) =
            validate::boolean(query.value(keys::HIGHLIGHT), keys::HIGHLIGHT, true);
        push(&mut errors, error);

        for error in &errors {
            warn!("rejected query parameter {}: {}", error.field, error.message);
        }

        let params = Self {
            limit,
            page,
            offset: pagination::calculate_offset(page, limit),
            after_date,
            before_date,
            keywords,
            sort,
            release_type,
            upcoming_filters,
            census,
            highlight,
        };
        (params, errors)
    }

    /// Read one date fieldset from the query.
    ///
    /// Split components take priority; the whole-date alias (`fromDate` /
    /// `toDate`) is only consulted when no component is present, and goes
    /// through the same component validation after splitting.
    fn date_from_query(query: &RawQuery, group: DateGroup) -> (DateField, Vec<FieldError>) {
        let day = query.value(group.day_key());
        let month = query.value(group.month_key());
        let year = query.value(group.year_key());

        if day.trim().is_empty() && month.trim().is_empty() && year.trim().is_empty() {
            let iso = query.value(group.iso_key()).trim();
            if !iso.is_empty() {
                let parts = RawDateParts::from_iso(iso);
                return validate::date_components(&parts.day, &parts.month, &parts.year, group);
            }
        }
        validate::date_components(day, month, year, group)
    }

    /// Serialize for the page's own links and form state.
    ///
    /// Uses front-end sort tokens, split date components (with assumed
    /// components suppressed) and the 1-based page number. Re-validating the
    /// result reproduces `self` exactly, so pagination links never drift.
    pub fn as_frontend_query(&self) -> QueryForm {
        let mut form = QueryForm::new();
        form.set(keys::LIMIT, self.limit.to_string());
        form.set(keys::PAGE, self.page.to_string());
        Self::set_date_components(&mut form, DateGroup::After, &self.after_date);
        Self::set_date_components(&mut form, DateGroup::Before, &self.before_date);
        form.set(keys::KEYWORDS, self.keywords.clone());
        form.set(keys::SORT, self.sort.frontend_token().to_owned());
        form.set(keys::RELEASE_TYPE, self.release_type.name().to_owned());
        self.set_upcoming_filters(&mut form);
        form.set(keys::CENSUS, self.census.to_string());
        form.set(keys::HIGHLIGHT, self.highlight.to_string());
        form
    }

    /// Serialize for the search backend.
    ///
    /// Uses backend sort tokens (inverted date orderings for upcoming
    /// releases), whole ISO dates and a 0-based offset instead of a page
    /// number. Invalid date input contributes nothing here.
    pub fn as_backend_query(&self) -> QueryForm {
        let mut form = QueryForm::new();
        form.set(keys::LIMIT, self.limit.to_string());
        form.set(keys::OFFSET, self.offset.to_string());
        if let Some(iso) = self.after_date.iso() {
            form.set(DateGroup::After.iso_key(), iso);
        }
        if let Some(iso) = self.before_date.iso() {
            form.set(DateGroup::Before.iso_key(), iso);
        }
        form.set(keys::QUERY, self.keywords.clone());
        form.set(keys::SORT, self.sort.backend_token(self.release_type).to_owned());
        form.set(keys::RELEASE_TYPE, self.release_type.name().to_owned());
        self.set_upcoming_filters(&mut form);
        form.set(keys::CENSUS, self.census.to_string());
        form.set(keys::HIGHLIGHT, self.highlight.to_string());
        form
    }

    fn set_date_components(form: &mut QueryForm, group: DateGroup, date: &DateField) {
        if let Some(value) = date.day_value() {
            form.set(group.day_key(), value);
        }
        if let Some(value) = date.month_value() {
            form.set(group.month_key(), value);
        }
        if let Some(value) = date.year_value() {
            form.set(group.year_key(), value);
        }
    }

    /// Sub-filters only make sense for the upcoming view and are only
    /// emitted when set.
    fn set_upcoming_filters(&self, form: &mut QueryForm) {
        if self.release_type != ReleaseType::Upcoming {
            return;
        }
        if self.upcoming_filters.provisional {
            form.set(keys::SUBTYPE_PROVISIONAL, true.to_string());
        }
        if self.upcoming_filters.confirmed {
            form.set(keys::SUBTYPE_CONFIRMED, true.to_string());
        }
        if self.upcoming_filters.postponed {
            form.set(keys::SUBTYPE_POSTPONED, true.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CalendarConfig {
        CalendarConfig::default()
    }

    fn parse(pairs: &[(&str, &str)]) -> (ValidatedParams, Vec<FieldError>) {
        let query = RawQuery::from_pairs(pairs.iter().copied());
        ValidatedParams::from_query(&query, &config())
    }

    #[test]
    fn test_empty_query_yields_defaults() {
        let (params, errors) = parse(&[]);
        assert!(errors.is_empty());
        assert_eq!(params.limit, 10);
        assert_eq!(params.page, 1);
        assert_eq!(params.offset, 0);
        assert!(params.after_date.is_absent());
        assert!(params.before_date.is_absent());
        assert_eq!(params.keywords, "");
        assert_eq!(params.sort, Sort::ReleaseDateDesc);
        assert_eq!(params.release_type, ReleaseType::Upcoming);
        assert!(!params.upcoming_filters.any());
        assert!(!params.census);
        assert!(params.highlight);
    }

    #[test]
    fn test_full_query_parses_every_field() {
        let (params, errors) = parse(&[
            ("limit", "25"),
            ("page", "3"),
            ("after-day", "1"),
            ("after-month", "6"),
            ("after-year", "2024"),
            ("before-year", "2025"),
            ("keywords", "  gross domestic product "),
            ("sort", "alphabetical-az"),
            ("release-type", "type-upcoming"),
            ("subtype-postponed", "true"),
            ("census", "true"),
            ("highlight", "false"),
        ]);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(params.limit, 25);
        assert_eq!(params.page, 3);
        assert_eq!(params.offset, 50);
        assert_eq!(params.after_date.iso().as_deref(), Some("2024-06-01"));
        assert_eq!(params.before_date.iso().as_deref(), Some("2025-01-01"));
        assert_eq!(params.keywords, "gross domestic product");
        assert_eq!(params.sort, Sort::TitleAZ);
        assert_eq!(params.release_type, ReleaseType::Upcoming);
        assert!(params.upcoming_filters.postponed);
        assert!(!params.upcoming_filters.provisional);
        assert!(params.census);
        assert!(!params.highlight);
    }

    #[test]
    fn test_bad_fields_fall_back_and_accumulate() {
        let (params, errors) = parse(&[
            ("limit", "not-a-number"),
            ("page", "0"),
            ("sort", "sideways"),
            ("release-type", "type-imaginary"),
            ("census", "yes"),
        ]);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["limit", "page", "sort", "release-type", "census"]);
        assert_eq!(params.limit, 10);
        assert_eq!(params.page, 1);
        assert_eq!(params.sort, Sort::ReleaseDateDesc);
        assert_eq!(params.release_type, ReleaseType::Upcoming);
        assert!(!params.census);
    }

    #[test]
    fn test_page_bound_depends_on_limit() {
        // 500 max results at 25 per page allows 20 pages
        let (params, errors) = parse(&[("limit", "25"), ("page", "20")]);
        assert!(errors.is_empty());
        assert_eq!(params.page, 20);

        let (params, errors) = parse(&[("limit", "25"), ("page", "21")]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "page");
        assert_eq!(errors[0].message, "Enter a number that is 20 or less");
        assert_eq!(params.page, 1);
    }

    #[test]
    fn test_offset_maps_back_to_its_page() {
        let (params, errors) = parse(&[("offset", "20")]);
        assert!(errors.is_empty());
        assert_eq!(params.page, 3);
        assert_eq!(params.offset, 20);

        // a mid-page offset lands on the page containing it
        let (params, _) = parse(&[("offset", "25")]);
        assert_eq!(params.page, 3);
        assert_eq!(params.offset, 20);
    }

    #[test]
    fn test_explicit_page_wins_over_offset() {
        let (params, errors) = parse(&[("page", "2"), ("offset", "40")]);
        assert!(errors.is_empty());
        assert_eq!(params.page, 2);
        assert_eq!(params.offset, 10);
    }

    #[test]
    fn test_bad_offset_is_reported_against_offset() {
        let (params, errors) = parse(&[("offset", "9999")]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "offset");
        assert_eq!(params.page, 1);
    }

    #[test]
    fn test_query_is_an_alias_for_keywords() {
        let (params, _) = parse(&[("query", "inflation")]);
        assert_eq!(params.keywords, "inflation");

        // keywords wins when both are present
        let (params, _) = parse(&[("keywords", "trade"), ("query", "inflation")]);
        assert_eq!(params.keywords, "trade");
    }

    #[test]
    fn test_relevance_without_keywords_reverts_to_default() {
        let (params, errors) = parse(&[("sort", "relevance")]);
        assert!(errors.is_empty());
        assert_eq!(params.sort, Sort::ReleaseDateDesc);

        let (params, _) = parse(&[("sort", "relevance"), ("keywords", "census")]);
        assert_eq!(params.sort, Sort::Relevance);

        // whitespace-only keywords do not count
        let (params, _) = parse(&[("sort", "relevance"), ("keywords", "   ")]);
        assert_eq!(params.sort, Sort::ReleaseDateDesc);
    }

    #[test]
    fn test_sub_filters_are_cleared_outside_the_upcoming_view() {
        let (params, errors) = parse(&[
            ("release-type", "type-published"),
            ("subtype-provisional", "true"),
        ]);
        assert!(errors.is_empty());
        assert!(!params.upcoming_filters.any());
    }

    #[test]
    fn test_whole_date_alias_is_split_and_validated() {
        let (params, errors) = parse(&[("fromDate", "2024-06-15"), ("toDate", "2025-01-01")]);
        assert!(errors.is_empty());
        assert_eq!(params.after_date.iso().as_deref(), Some("2024-06-15"));
        assert_eq!(params.before_date.iso().as_deref(), Some("2025-01-01"));

        let (params, errors) = parse(&[("fromDate", "junk")]);
        assert!(!errors.is_empty());
        assert_eq!(params.after_date.iso(), None);
    }

    #[test]
    fn test_split_components_take_priority_over_alias() {
        let (params, errors) = parse(&[("after-year", "2023"), ("fromDate", "2024-06-15")]);
        assert!(errors.is_empty());
        assert_eq!(params.after_date.iso().as_deref(), Some("2023-01-01"));
    }

    #[test]
    fn test_inverted_date_range_is_one_error() {
        let (params, errors) = parse(&[("after-year", "2025"), ("before-year", "2024")]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "before-year");
        // both dates stay resolved; only the range is at fault
        assert_eq!(params.after_date.iso().as_deref(), Some("2025-01-01"));
        assert_eq!(params.before_date.iso().as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn test_frontend_query_round_trips() {
        let (params, errors) = parse(&[
            ("limit", "25"),
            ("page", "4"),
            ("after-day", "9"),
            ("after-month", "2"),
            ("after-year", "2024"),
            ("before-year", "2025"),
            ("keywords", "labour market"),
            ("sort", "date-oldest"),
            ("release-type", "type-upcoming"),
            ("subtype-confirmed", "true"),
            ("census", "true"),
            ("highlight", "false"),
        ]);
        assert!(errors.is_empty());

        let form = params.as_frontend_query();
        let reparsed_query = RawQuery::from_pairs(form.iter());
        let (reparsed, errors) = ValidatedParams::from_query(&reparsed_query, &config());
        assert!(errors.is_empty(), "round trip raised errors: {errors:?}");
        assert_eq!(reparsed, params);
    }

    #[test]
    fn test_frontend_query_suppresses_assumed_components() {
        let (params, _) = parse(&[("after-year", "2024")]);
        let form = params.as_frontend_query();
        assert_eq!(form.get("after-year"), Some("2024"));
        assert!(!form.contains("after-month"));
        assert!(!form.contains("after-day"));
    }

    #[test]
    fn test_frontend_query_keeps_invalid_input_for_re_display() {
        let (params, errors) = parse(&[("before-day", "40"), ("before-year", "2024")]);
        assert_eq!(errors.len(), 1);
        let form = params.as_frontend_query();
        assert_eq!(form.get("before-day"), Some("40"));
        assert_eq!(form.get("before-year"), Some("2024"));
    }

    #[test]
    fn test_backend_query_speaks_the_backend_vocabulary() {
        let (params, errors) = parse(&[
            ("limit", "25"),
            ("page", "3"),
            ("after-year", "2024"),
            ("keywords", "inflation"),
            ("sort", "date-newest"),
            ("release-type", "type-published"),
        ]);
        assert!(errors.is_empty());

        let form = params.as_backend_query();
        assert_eq!(form.get("limit"), Some("25"));
        assert_eq!(form.get("offset"), Some("50"));
        assert!(!form.contains("page"));
        assert_eq!(form.get("fromDate"), Some("2024-01-01"));
        assert!(!form.contains("after-year"));
        assert_eq!(form.get("query"), Some("inflation"));
        assert!(!form.contains("keywords"));
        assert_eq!(form.get("sort"), Some("release_date_desc"));
        assert_eq!(form.get("release-type"), Some("type-published"));
        assert_eq!(form.get("highlight"), Some("true"));
        assert_eq!(form.get("census"), Some("false"));
    }

    #[test]
    fn test_backend_query_inverts_date_sort_for_upcoming() {
        let (params, _) = parse(&[("sort", "date-newest"), ("release-type", "type-upcoming")]);
        assert_eq!(params.as_backend_query().get("sort"), Some("release_date_asc"));
        // the page's own links keep the token the user chose
        assert_eq!(params.as_frontend_query().get("sort"), Some("date-newest"));

        let (params, _) = parse(&[("sort", "date-newest"), ("release-type", "type-published")]);
        assert_eq!(params.as_backend_query().get("sort"), Some("release_date_desc"));
    }

    #[test]
    fn test_backend_query_omits_zero_offset_and_invalid_dates() {
        let (params, _) = parse(&[("page", "1"), ("before-day", "40"), ("before-year", "2024")]);
        let form = params.as_backend_query();
        assert!(!form.contains("offset"));
        assert!(!form.contains("toDate"));
        assert!(!form.contains("before-day"));
    }
}
