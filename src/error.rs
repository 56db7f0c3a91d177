//! Error types for brand-owner-tracker.
//!
//! Most failures never reach callers: extraction and insertion absorb them
//! into "not found" values. These variants are what the component boundaries
//! see before that happens.

/// Error type for tracker operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A CSS selector could not be parsed or evaluated.
    #[error("selector `{selector}` failed: {reason}")]
    Selector {
        /// The selector text that failed.
        selector: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The owner lookup request failed at the transport or HTTP level.
    #[error("owner lookup failed: {0}")]
    Lookup(String),

    /// The owner lookup returned a body of the wrong shape.
    #[error("invalid owner lookup response: {0}")]
    InvalidResponse(String),

    /// The owner lookup did not answer within the configured timeout.
    #[error("owner lookup timed out")]
    Timeout,

    /// A widget update was attempted from a terminal state.
    #[error("widget cannot move from {from} to {to}")]
    WidgetTransition {
        /// State the widget is in.
        from: &'static str,
        /// Requested state.
        to: &'static str,
    },

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Lookup(err.to_string())
        }
    }
}

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, Error>;
