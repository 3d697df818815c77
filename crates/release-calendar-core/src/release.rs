//! Search-backend response shapes and publication-state derivation.
//!
//! The backend reports a release's lifecycle as independent flags plus a
//! history of date changes; [`Release::publication_state`] collapses those
//! into the one state the page renders. The state is derived fresh every
//! time a result row is mapped and is never stored back onto the release.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slice of the search-backend response this crate consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub number_of_results: usize,
    #[serde(default)]
    pub releases: Vec<Release>,
}

/// One release entry in a search response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    /// Scheduled or actual release timestamp, as the backend supplied it
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub finalised: bool,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub census: bool,
    /// Date-change history, oldest first
    #[serde(default)]
    pub date_changes: Vec<DateChange>,
}

/// Record of the release date having been moved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateChange {
    /// The date the release was scheduled for before this change
    #[serde(default)]
    pub previous_date: String,
    #[serde(default)]
    pub change_notice: String,
}

/// Publication state of a release, as shown on the listing page.
///
/// Cancellation beats publication beats everything else; only a release that
/// is neither counts as upcoming and gets a sub-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationState {
    Published,
    Cancelled,
    Upcoming(UpcomingState),
}

/// Sub-state of an upcoming release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpcomingState {
    /// Date is finalised and has not slipped
    Confirmed,
    /// Date is not yet finalised
    Provisional,
    /// Date is finalised but later than it used to be
    Postponed,
}

impl PublicationState {
    /// Lowercase label for display and filtering.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Cancelled => "cancelled",
            Self::Upcoming(_) => "upcoming",
        }
    }

    /// Label of the upcoming sub-state, when there is one.
    pub const fn sub_label(self) -> Option<&'static str> {
        match self {
            Self::Upcoming(sub) => Some(sub.label()),
            Self::Published | Self::Cancelled => None,
        }
    }
}

impl UpcomingState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Provisional => "provisional",
            Self::Postponed => "postponed",
        }
    }
}

impl fmt::Display for PublicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for UpcomingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Release {
    /// Derive the publication state from the lifecycle flags and the
    /// date-change history.
    pub fn publication_state(&self) -> PublicationState {
        if self.cancelled {
            return PublicationState::Cancelled;
        }
        if self.published {
            return PublicationState::Published;
        }
        if !self.finalised {
            return PublicationState::Upcoming(UpcomingState::Provisional);
        }
        if self.is_postponed() {
            PublicationState::Upcoming(UpcomingState::Postponed)
        } else {
            PublicationState::Upcoming(UpcomingState::Confirmed)
        }
    }

    /// True when the scheduled date slipped to later than it was before the
    /// most recent change. Earlier history entries never participate, and a
    /// timestamp that fails to parse on either side leaves the release
    /// confirmed.
    fn is_postponed(&self) -> bool {
        let Some(last_change) = self.date_changes.last() else {
            return false;
        };
        match (
            parse_timestamp(&self.release_date),
            parse_timestamp(&last_change.previous_date),
        ) {
            (Some(release), Some(previous)) => release > previous,
            _ => false,
        }
    }
}

/// Parse a backend timestamp: RFC 3339 first, then a bare `YYYY-MM-DD` day
/// read as midnight UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}
