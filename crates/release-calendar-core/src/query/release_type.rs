use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Lifecycle filter selectable on the release listing page.
///
/// Exactly one of the three is always in effect; the sub-states of upcoming
/// releases are refined separately through [`UpcomingFilters`] and are not
/// valid values for this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
    Upcoming,
    Published,
    Cancelled,
}

impl ReleaseType {
    const ALL: [Self; 3] = [Self::Upcoming, Self::Published, Self::Cancelled];

    /// Query-string token for this release type.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Upcoming => "type-upcoming",
            Self::Published => "type-published",
            Self::Cancelled => "type-cancelled",
        }
    }

    /// Parse a query-string token, case-insensitively.
    pub fn from_name(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|release_type| release_type.name().eq_ignore_ascii_case(token))
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ReleaseType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ReleaseType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Self::from_name(&token)
            .ok_or_else(|| de::Error::custom(format!("unknown release type: {token}")))
    }
}

/// Opt-in refinements of the upcoming view.
///
/// Only meaningful while the release type is [`ReleaseType::Upcoming`];
/// serialization skips them entirely for the other types, and a flag is only
/// ever emitted when set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpcomingFilters {
    pub provisional: bool,
    pub confirmed: bool,
    pub postponed: bool,
}

impl UpcomingFilters {
    /// True when at least one refinement is requested.
    pub const fn any(self) -> bool {
        self.provisional || self.confirmed || self.postponed
    }
}
