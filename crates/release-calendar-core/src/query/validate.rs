//! Per-field validators.
//!
//! Every validator is total: it returns a usable value alongside an optional
//! [`FieldError`], never an error alone. Bad input falls back to the supplied
//! default so the caller can accumulate errors across the whole query and
//! still render a page. An empty raw value is "not supplied", not an error.

use chrono::NaiveDate;

use super::date::{DateField, DateGroup, ErroredParts, InvalidDate, RawDateParts, ResolvedDate};
use super::release_type::ReleaseType;
use super::sort::Sort;
use crate::error::FieldError;

/// Smallest accepted day or month component.
pub const DATE_COMPONENT_MIN: usize = 1;
/// Largest accepted day or month component; real calendar validity is
/// checked separately, once all components are numerically plausible.
pub const DATE_COMPONENT_MAX: usize = 99;
/// Earliest accepted year.
pub const YEAR_MIN: usize = 1900;
/// Latest accepted year.
pub const YEAR_MAX: usize = 2150;

/// Validate an integer field against inclusive bounds.
///
/// Out-of-range values report the bound they broke; anything unparseable
/// gets the generic numeric message. The default is returned in every
/// failure case.
// bounds come from configuration and the date vocabulary, all far below i64
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub fn bounded_int(
    raw: &str,
    field: &str,
    min: usize,
    max: usize,
    default: usize,
) -> (usize, Option<FieldError>) {
    let raw = raw.trim();
    if raw.is_empty() {
        return (default, None);
    }
    let Ok(value) = raw.parse::<i64>() else {
        return (default, Some(FieldError::new(field, "Enter a number")));
    };
    if value < min as i64 {
        let message = format!("Enter a number that is {min} or more");
        (default, Some(FieldError::new(field, message)))
    } else if value > max as i64 {
        let message = format!("Enter a number that is {max} or less");
        (default, Some(FieldError::new(field, message)))
    } else {
        (value as usize, None)
    }
}

/// Validate a boolean field; only the literals `true` and `false` parse.
pub fn boolean(raw: &str, field: &str, default: bool) -> (bool, Option<FieldError>) {
    let raw = raw.trim();
    if raw.is_empty() {
        return (default, None);
    }
    match raw.parse::<bool>() {
        Ok(value) => (value, None),
        Err(_) => (default, Some(FieldError::new(field, "Enter true or false"))),
    }
}

/// Validate a sort order against the front-end vocabulary.
pub fn sort(raw: &str, field: &str, default: Sort) -> (Sort, Option<FieldError>) {
    let raw = raw.trim();
    if raw.is_empty() {
        return (default, None);
    }
    match Sort::from_frontend(raw) {
        Some(value) => (value, None),
        None => (default, Some(FieldError::new(field, "Select a valid sort order"))),
    }
}

/// Validate a release type against its token vocabulary.
pub fn release_type(
    raw: &str,
    field: &str,
    default: ReleaseType,
) -> (ReleaseType, Option<FieldError>) {
    let raw = raw.trim();
    if raw.is_empty() {
        return (default, None);
    }
    match ReleaseType::from_name(raw) {
        Some(value) => (value, None),
        None => (default, Some(FieldError::new(field, "Select a valid release type"))),
    }
}

/// Validate the split day/month/year inputs of one date fieldset.
///
/// The year anchors the group: day or month without a year is rejected
/// outright and nothing else is checked. A present year with missing month
/// or day resolves by assuming January or the 1st, and the assumption is
/// recorded so re-display can suppress what the user never typed.
///
/// Component bounds are deliberately loose (day and month up to
/// [`DATE_COMPONENT_MAX`]); whether the components form a real calendar day
/// is checked only after each one passes on its own, so an impossible date
/// like 30 February gets its own error instead of a per-field one.
pub fn date_components(
    day_raw: &str,
    month_raw: &str,
    year_raw: &str,
    group: DateGroup,
) -> (DateField, Vec<FieldError>) {
    let day_raw = day_raw.trim();
    let month_raw = month_raw.trim();
    let year_raw = year_raw.trim();

    if day_raw.is_empty() && month_raw.is_empty() && year_raw.is_empty() {
        return (DateField::Absent, Vec::new());
    }

    let parts = RawDateParts {
        day: day_raw.to_owned(),
        month: month_raw.to_owned(),
        year: year_raw.to_owned(),
    };

    if year_raw.is_empty() {
        let message = format!("Enter the {} year", group.label());
        let invalid = InvalidDate {
            parts,
            errored: ErroredParts {
                year: true,
                ..Default::default()
            },
        };
        return (
            DateField::Invalid(invalid),
            vec![FieldError::new(group.year_key(), message)],
        );
    }

    let assumed_day = day_raw.is_empty();
    let assumed_month = month_raw.is_empty();

    let mut errors = Vec::new();
    let mut errored = ErroredParts::default();

    let (day, day_error) = if assumed_day {
        (DATE_COMPONENT_MIN, None)
    } else {
        bounded_int(
            day_raw,
            group.day_key(),
            DATE_COMPONENT_MIN,
            DATE_COMPONENT_MAX,
            DATE_COMPONENT_MIN,
        )
    };
    if let Some(error) = day_error {
        errored.day = true;
        errors.push(error);
    }

    let (month, month_error) = if assumed_month {
        (DATE_COMPONENT_MIN, None)
    } else {
        bounded_int(
            month_raw,
            group.month_key(),
            DATE_COMPONENT_MIN,
            DATE_COMPONENT_MAX,
            DATE_COMPONENT_MIN,
        )
    };
    if let Some(error) = month_error {
        errored.month = true;
        errors.push(error);
    }

    let (year, year_error) = bounded_int(year_raw, group.year_key(), YEAR_MIN, YEAR_MAX, YEAR_MIN);
    if let Some(error) = year_error {
        errored.year = true;
        errors.push(error);
    }

    if !errors.is_empty() {
        return (DateField::Invalid(InvalidDate { parts, errored }), errors);
    }

    // components are range-checked above, so the casts cannot overflow
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let date = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32);
    match date {
        Some(date) => (
            DateField::Resolved(ResolvedDate::new(date, assumed_month, assumed_day)),
            Vec::new(),
        ),
        None => {
            let invalid = InvalidDate {
                parts,
                errored: ErroredParts::all(),
            };
            (
                DateField::Invalid(invalid),
                vec![FieldError::new(group.fieldset_key(), "Enter a real date")],
            )
        }
    }
}

/// Check that the two ends of the date range are ordered.
///
/// Only applies when both ends resolved; a missing or already-invalid end
/// never produces a second error. The error is attributed to the "released
/// before" year input so the form highlights the range end.
pub fn date_range(from: &DateField, to: &DateField) -> Option<FieldError> {
    let (Some(from_date), Some(to_date)) = (from.as_date(), to.as_date()) else {
        return None;
    };
    (from_date > to_date).then(|| {
        FieldError::new(
            DateGroup::Before.year_key(),
            "Enter a released before date that is after the released after date",
        )
    })
}
