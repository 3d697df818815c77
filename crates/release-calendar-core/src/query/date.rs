use std::fmt;

use chrono::{Datelike, NaiveDate};

use super::keys;

/// Which end of the date range a component belongs to.
///
/// Carries the query-key and label vocabulary for one fieldset so errors and
/// serialized values always land on the right inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateGroup {
    /// The "released after" fieldset (range start)
    After,
    /// The "released before" fieldset (range end)
    Before,
}

impl DateGroup {
    /// Human-readable fieldset label, as used inside error messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::After => "released after",
            Self::Before => "released before",
        }
    }

    pub const fn day_key(self) -> &'static str {
        match self {
            Self::After => keys::AFTER_DAY,
            Self::Before => keys::BEFORE_DAY,
        }
    }

    pub const fn month_key(self) -> &'static str {
        match self {
            Self::After => keys::AFTER_MONTH,
            Self::Before => keys::BEFORE_MONTH,
        }
    }

    pub const fn year_key(self) -> &'static str {
        match self {
            Self::After => keys::AFTER_YEAR,
            Self::Before => keys::BEFORE_YEAR,
        }
    }

    /// Identifier for the fieldset as a whole, used when no single component
    /// is to blame (an impossible calendar date).
    pub const fn fieldset_key(self) -> &'static str {
        match self {
            Self::After => "after-date",
            Self::Before => "before-date",
        }
    }

    /// Whole-date alias key: accepted on input for pre-filled links and used
    /// in the backend serialization.
    pub const fn iso_key(self) -> &'static str {
        match self {
            Self::After => keys::FROM_DATE,
            Self::Before => keys::TO_DATE,
        }
    }
}

/// Raw day/month/year strings as supplied by the user, kept for re-display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDateParts {
    pub day: String,
    pub month: String,
    pub year: String,
}

impl RawDateParts {
    /// Split a whole-date value (`YYYY-MM-DD`) into its components.
    ///
    /// No validation happens here: malformed input simply yields parts that
    /// will fail component validation with the ordinary per-field errors, and
    /// a truncated value such as `2024-06` leaves the missing components
    /// empty so they are assumed like any other omitted input.
    pub fn from_iso(raw: &str) -> Self {
        let mut components = raw.trim().splitn(3, '-');
        let mut next = || components.next().unwrap_or("").trim().to_owned();
        let year = next();
        let month = next();
        let day = next();
        Self { day, month, year }
    }
}

/// Which of the three inputs failed validation, for form highlighting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErroredParts {
    pub day: bool,
    pub month: bool,
    pub year: bool,
}

impl ErroredParts {
    /// All three inputs flagged at once.
    pub(crate) const fn all() -> Self {
        Self {
            day: true,
            month: true,
            year: true,
        }
    }
}

/// A date that resolved to a real calendar day.
///
/// Remembers which components were assumed rather than supplied (a bare year
/// resolves to the 1st of January); assumed components are suppressed when
/// the form is re-rendered, so the user sees exactly what they typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    date: NaiveDate,
    assumed_month: bool,
    assumed_day: bool,
}

impl ResolvedDate {
    pub(crate) const fn new(date: NaiveDate, assumed_month: bool, assumed_day: bool) -> Self {
        Self {
            date,
            assumed_month,
            assumed_day,
        }
    }

    pub const fn date(self) -> NaiveDate {
        self.date
    }

    pub const fn assumed_month(self) -> bool {
        self.assumed_month
    }

    pub const fn assumed_day(self) -> bool {
        self.assumed_day
    }

    /// The date in ISO `YYYY-MM-DD` form.
    pub fn iso(self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// An unresolvable date: the raw input plus which inputs to flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidDate {
    pub parts: RawDateParts,
    pub errored: ErroredParts,
}

/// One end of the date range, in one of three states.
///
/// The states are mutually exclusive: an absent date contributes nothing, a
/// resolved date is a real calendar day, and an invalid date keeps the raw
/// input around for re-display. There is no way to hold a date and an error
/// at the same time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DateField {
    /// No component of this date was supplied.
    #[default]
    Absent,
    /// All supplied components validated and resolved to a calendar day.
    Resolved(ResolvedDate),
    /// At least one component was rejected.
    Invalid(InvalidDate),
}

impl DateField {
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The resolved calendar day, if there is one.
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Resolved(resolved) => Some(resolved.date()),
            Self::Absent | Self::Invalid(_) => None,
        }
    }

    /// ISO `YYYY-MM-DD` form of the resolved day, if there is one.
    pub fn iso(&self) -> Option<String> {
        match self {
            Self::Resolved(resolved) => Some(resolved.iso()),
            Self::Absent | Self::Invalid(_) => None,
        }
    }

    /// Year component for form re-display.
    pub fn year_value(&self) -> Option<String> {
        match self {
            Self::Absent => None,
            Self::Resolved(resolved) => Some(resolved.date().year().to_string()),
            Self::Invalid(invalid) => non_empty(&invalid.parts.year),
        }
    }

    /// Month component for form re-display; `None` when it was assumed.
    pub fn month_value(&self) -> Option<String> {
        match self {
            Self::Absent => None,
            Self::Resolved(resolved) => {
                (!resolved.assumed_month()).then(|| resolved.date().month().to_string())
            }
            Self::Invalid(invalid) => non_empty(&invalid.parts.month),
        }
    }

    /// Day component for form re-display; `None` when it was assumed.
    pub fn day_value(&self) -> Option<String> {
        match self {
            Self::Absent => None,
            Self::Resolved(resolved) => {
                (!resolved.assumed_day()).then(|| resolved.date().day().to_string())
            }
            Self::Invalid(invalid) => non_empty(&invalid.parts.day),
        }
    }
}

/// A resolved date prints as ISO `YYYY-MM-DD`; the other states print empty.
impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(resolved) => write!(f, "{}", resolved.date().format("%Y-%m-%d")),
            Self::Absent | Self::Invalid(_) => Ok(()),
        }
    }
}

fn non_empty(raw: &str) -> Option<String> {
    (!raw.is_empty()).then(|| raw.to_owned())
}
