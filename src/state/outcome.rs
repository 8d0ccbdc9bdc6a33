use crate::storage::BookRecord;
use crate::CrawlError;
use std::fmt;

/// Why a book was left out of the aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The download endpoint redirected away, so the site has no text for it
    Unavailable,

    /// A request failed (connection error, timeout, non-success status)
    Transport,

    /// The detail page did not have the expected markup, or the link was malformed
    Extraction,

    /// Writing the downloaded files failed
    Io,
}

impl SkipReason {
    /// Classifies the error that stopped a book
    pub fn from_error(error: &CrawlError) -> Self {
        match error {
            CrawlError::Unavailable { .. } => Self::Unavailable,
            CrawlError::Transport { .. }
            | CrawlError::HttpStatus { .. }
            | CrawlError::Reqwest(_) => Self::Transport,
            CrawlError::Io(_) | CrawlError::Json(_) | CrawlError::Output(_) => Self::Io,
            _ => Self::Extraction,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Transport => "transport",
            Self::Extraction => "extraction",
            Self::Io => "io",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A book that was not fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBook {
    /// Detail-page link the book was collected from
    pub url: String,
    pub reason: SkipReason,
    /// Error message, for the log and the final report
    pub detail: String,
}

/// Result of fetching one book
#[derive(Debug)]
pub enum FetchOutcome {
    /// Book page extracted and all requested files saved
    Fetched(BookRecord),

    /// Book left out; nothing was written for it
    Skipped(SkippedBook),
}

impl FetchOutcome {
    /// Builds the skipped outcome for a book whose fetch failed
    pub fn skipped(url: &str, error: &CrawlError) -> Self {
        Self::Skipped(SkippedBook {
            url: url.to_string(),
            reason: SkipReason::from_error(error),
            detail: error.to_string(),
        })
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }
}
