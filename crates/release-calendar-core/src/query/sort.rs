use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use super::release_type::ReleaseType;

/// Requested ordering of search results.
///
/// Every sort has two string forms: the front-end token that appears in page
/// URLs and the token the search backend understands. Both directions of the
/// mapping go through [`Sort::tokens`], so the two vocabularies cannot drift
/// apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    /// Earliest release date first
    ReleaseDateAsc,
    /// Latest release date first
    ReleaseDateDesc,
    /// Title A to Z
    TitleAZ,
    /// Title Z to A
    TitleZA,
    /// Best keyword match first
    Relevance,
}

impl Sort {
    const ALL: [Self; 5] = [
        Self::ReleaseDateAsc,
        Self::ReleaseDateDesc,
        Self::TitleAZ,
        Self::TitleZA,
        Self::Relevance,
    ];

    /// (front-end token, backend token) pair for this sort.
    const fn tokens(self) -> (&'static str, &'static str) {
        match self {
            Self::ReleaseDateAsc => ("date-oldest", "release_date_asc"),
            Self::ReleaseDateDesc => ("date-newest", "release_date_desc"),
            Self::TitleAZ => ("alphabetical-az", "title_asc"),
            Self::TitleZA => ("alphabetical-za", "title_desc"),
            Self::Relevance => ("relevance", "relevance"),
        }
    }

    /// Parse a front-end token, case-insensitively.
    ///
    /// Returns `None` for anything outside the closed vocabulary; backend
    /// tokens are not accepted here.
    pub fn from_frontend(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|sort| sort.tokens().0.eq_ignore_ascii_case(token))
    }

    /// Token used in public page URLs.
    pub const fn frontend_token(self) -> &'static str {
        self.tokens().0
    }

    /// Token sent to the search backend.
    ///
    /// For upcoming releases "newest first" means the nearest future date,
    /// which is chronologically *ascending*, so the two date orderings swap
    /// backend tokens when the release type is [`ReleaseType::Upcoming`].
    pub const fn backend_token(self, release_type: ReleaseType) -> &'static str {
        let effective = match (release_type, self) {
            (ReleaseType::Upcoming, Self::ReleaseDateAsc) => Self::ReleaseDateDesc,
            (ReleaseType::Upcoming, Self::ReleaseDateDesc) => Self::ReleaseDateAsc,
            (_, sort) => sort,
        };
        effective.tokens().1
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.frontend_token())
    }
}

impl Serialize for Sort {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.frontend_token())
    }
}

impl<'de> Deserialize<'de> for Sort {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Self::from_frontend(&token)
            .ok_or_else(|| de::Error::custom(format!("unknown sort order: {token}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_frontend_accepts_every_token() {
        for sort in Sort::ALL {
            assert_eq!(Sort::from_frontend(sort.frontend_token()), Some(sort));
        }
    }

    #[test]
    fn test_from_frontend_is_case_insensitive() {
        assert_eq!(Sort::from_frontend("Date-Newest"), Some(Sort::ReleaseDateDesc));
        assert_eq!(Sort::from_frontend("RELEVANCE"), Some(Sort::Relevance));
    }

    #[test]
    fn test_from_frontend_rejects_unknown_and_backend_tokens() {
        assert_eq!(Sort::from_frontend("shuffled"), None);
        assert_eq!(Sort::from_frontend("release_date_desc"), None);
        assert_eq!(Sort::from_frontend(""), None);
    }

    #[test]
    fn test_backend_token_without_inversion() {
        assert_eq!(
            Sort::ReleaseDateDesc.backend_token(ReleaseType::Published),
            "release_date_desc"
        );
        assert_eq!(
            Sort::ReleaseDateAsc.backend_token(ReleaseType::Cancelled),
            "release_date_asc"
        );
        assert_eq!(Sort::TitleAZ.backend_token(ReleaseType::Published), "title_asc");
    }

    #[test]
    fn test_backend_token_inverts_date_orderings_for_upcoming() {
        assert_eq!(
            Sort::ReleaseDateDesc.backend_token(ReleaseType::Upcoming),
            "release_date_asc"
        );
        assert_eq!(
            Sort::ReleaseDateAsc.backend_token(ReleaseType::Upcoming),
            "release_date_desc"
        );
    }

    #[test]
    fn test_backend_token_leaves_other_sorts_alone_for_upcoming() {
        assert_eq!(Sort::TitleAZ.backend_token(ReleaseType::Upcoming), "title_asc");
        assert_eq!(Sort::TitleZA.backend_token(ReleaseType::Upcoming), "title_desc");
        assert_eq!(Sort::Relevance.backend_token(ReleaseType::Upcoming), "relevance");
    }

    #[test]
    fn test_serde_round_trip() {
        for sort in Sort::ALL {
            let json = serde_json::to_string(&sort).unwrap();
            let back: Sort = serde_json::from_str(&json).unwrap();
            assert_eq!(back, sort);
        }
        assert!(serde_json::from_str::<Sort>("\"sideways\"").is_err());
    }
}
