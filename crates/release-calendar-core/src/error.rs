use thiserror::Error;

/// Unified error type for release-calendar-core
///
/// This enum encompasses the fatal error cases that can occur in the library:
/// configuration loading and validation. Even a missing or unreadable config
/// file surfaces as [`Error::ConfigLoad`]; the crate performs no other I/O.
///
/// Rejected query parameters are deliberately *not* represented here; they
/// are reported as [`FieldError`] values and never abort request handling.
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// A validation failure on a single query field.
///
/// `field` is the identifier of the offending form input (or fieldset), e.g.
/// `after-year`, so callers can attach the message to the right control.
/// Validators return these alongside a usable fallback value; a request with
/// field errors still renders a page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Identifier of the offending field or fieldset
    pub field: String,
    /// Human-readable message, ready for inline display
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
