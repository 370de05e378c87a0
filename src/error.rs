use std::time::Duration;
use thiserror::Error;

/// Failures while driving the browser through the search UI
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("element not found: {locator}")]
    ElementNotFound { locator: String },

    #[error("timed out after {waited:?} waiting for url `{pattern}` (last url: {last_url})")]
    UrlTimeout {
        pattern: String,
        last_url: String,
        waited: Duration,
    },

    #[error("browser error: {0:#}")]
    Browser(#[source] anyhow::Error),
}

impl NavigationError {
    /// Timing failures may clear up on a second attempt; missing markup will not
    pub fn is_transient(&self) -> bool {
        matches!(self, NavigationError::UrlTimeout { .. })
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("pagination control exposes {entries} entries, need at least 3")]
    PaginationTooShort { entries: usize },

    #[error("pagination entry `{text}` is not a page number")]
    PageNumber { text: String },

    #[error("pagination reports zero pages")]
    ZeroPages,

    #[error("invalid selector `{selector}`")]
    Selector { selector: String },
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid url pattern `{glob}`: {source}")]
    UrlPattern {
        glob: String,
        #[source]
        source: regex::Error,
    },
}
