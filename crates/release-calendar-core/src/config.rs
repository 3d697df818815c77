use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::query::{ReleaseType, Sort};

/// Application configuration
///
/// Threaded explicitly into [`ValidatedParams::from_query`] and the
/// pagination helpers; nothing in the crate reads configuration from global
/// state.
///
/// [`ValidatedParams::from_query`]: crate::query::ValidatedParams::from_query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Results per page when no limit is requested
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Largest accepted value for the limit parameter
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    /// Cap on reachable results; bounds how deep pagination can go
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,

    /// Sort applied when none is requested (front-end token, e.g.
    /// "date-newest")
    #[serde(default = "default_sort")]
    pub default_sort: Sort,

    /// Release type shown when none is requested (e.g. "type-upcoming")
    #[serde(default = "default_release_type")]
    pub default_release_type: ReleaseType,

    /// Number of page links rendered in the pagination window
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

const fn default_limit() -> usize {
    10
}

const fn default_max_limit() -> usize {
    100
}

const fn default_max_search_results() -> usize {
    500
}

const fn default_sort() -> Sort {
    Sort::ReleaseDateDesc
}

const fn default_release_type() -> ReleaseType {
    ReleaseType::Upcoming
}

const fn default_window_size() -> usize {
    5
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            max_search_results: default_max_search_results(),
            default_sort: default_sort(),
            default_release_type: default_release_type(),
            window_size: default_window_size(),
        }
    }
}

impl CalendarConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::ConfigLoad(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations (~/.config/release-calendar/config.toml, ./config.toml)
    pub fn load() -> Self {
        Self::load_with(
            crate::util::config_dir(),
            std::path::Path::new("config.toml"),
        )
    }

    /// Resolution chain behind [`Self::load`]: `release-calendar/config.toml`
    /// under `config_dir` first, then `local_config`, then defaults. A file
    /// that fails to load is logged and skipped, not fatal.
    fn load_with(config_dir: Option<std::path::PathBuf>, local_config: &std::path::Path) -> Self {
        // Try user config
        if let Some(config_dir) = config_dir {
            let user_config = config_dir.join("release-calendar").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Try local config
        if local_config.exists() {
            match Self::from_file(local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from {}", local_config.display());
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}", local_config.display(), e);
                }
            }
        }

        // Return defaults
        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    /// Check the configuration is internally consistent.
    pub fn validate(&self) -> Result<()> {
        if self.default_limit > self.max_limit {
            return Err(Error::ConfigInvalid {
                field: "default_limit".to_string(),
                reason: format!(
                    "default limit {} exceeds max limit {}",
                    self.default_limit, self.max_limit
                ),
            });
        }
        if self.window_size == 0 {
            return Err(Error::ConfigInvalid {
                field: "window_size".to_string(),
                reason: "window size must be at least 1".to_string(),
            });
        }
        if self.default_sort == Sort::Relevance {
            return Err(Error::ConfigInvalid {
                field: "default_sort".to_string(),
                reason: "relevance cannot be the default sort, it requires keywords".to_string(),
            });
        }
        Ok(())
    }

    /// Largest page number reachable at the given limit.
    ///
    /// Derived from the result cap; always at least 1 so the page validator
    /// has a sane bound even for a zero limit.
    pub const fn max_page(&self, limit: usize) -> usize {
        if limit == 0 {
            return 1;
        }
        let pages = self.max_search_results / limit;
        if pages == 0 { 1 } else { pages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_consistent() {
        let config = CalendarConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.max_limit, 100);
        assert_eq!(config.max_search_results, 500);
        assert_eq!(config.default_sort, Sort::ReleaseDateDesc);
        assert_eq!(config.default_release_type, ReleaseType::Upcoming);
        assert_eq!(config.window_size, 5);
    }

    #[test]
    fn test_max_page_scales_with_limit() {
        let config = CalendarConfig::default();
        assert_eq!(config.max_page(10), 50);
        assert_eq!(config.max_page(25), 20);
        assert_eq!(config.max_page(0), 1);
        // a limit above the result cap still leaves one page
        assert_eq!(config.max_page(1000), 1);
    }

    #[test]
    fn test_validate_rejects_inconsistent_values() {
        let config = CalendarConfig {
            default_limit: 200,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = CalendarConfig {
            window_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = CalendarConfig {
            default_sort: Sort::Relevance,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    fn write_user_config(root: &std::path::Path, content: &str) {
        let user_dir = root.join("release-calendar");
        std::fs::create_dir_all(&user_dir).unwrap();
        std::fs::write(user_dir.join("config.toml"), content).unwrap();
    }

    #[test]
    fn test_load_with_prefers_the_user_config() {
        let dir = tempfile::TempDir::new().unwrap();
        write_user_config(dir.path(), "default_limit = 25\n");
        let local = dir.path().join("config.toml");
        std::fs::write(&local, "default_limit = 50\n").unwrap();

        let config = CalendarConfig::load_with(Some(dir.path().to_path_buf()), &local);
        assert_eq!(config.default_limit, 25);
    }

    #[test]
    fn test_load_with_falls_back_to_the_local_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let local = dir.path().join("config.toml");
        std::fs::write(&local, "default_limit = 50\n").unwrap();

        // no user config under this root, and no root at all
        let config = CalendarConfig::load_with(Some(dir.path().to_path_buf()), &local);
        assert_eq!(config.default_limit, 50);
        let config = CalendarConfig::load_with(None, &local);
        assert_eq!(config.default_limit, 50);
    }

    #[test]
    fn test_load_with_skips_an_invalid_user_config() {
        let dir = tempfile::TempDir::new().unwrap();
        // parses but fails validation: default above the max limit
        write_user_config(dir.path(), "default_limit = 500\n");
        let local = dir.path().join("config.toml");
        std::fs::write(&local, "default_limit = 50\n").unwrap();

        let config = CalendarConfig::load_with(Some(dir.path().to_path_buf()), &local);
        assert_eq!(config.default_limit, 50);
    }

    #[test]
    fn test_load_with_defaults_when_no_file_is_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = CalendarConfig::load_with(
            Some(dir.path().to_path_buf()),
            &dir.path().join("config.toml"),
        );
        assert_eq!(config.default_limit, default_limit());
        assert_eq!(config.window_size, default_window_size());
    }
}
