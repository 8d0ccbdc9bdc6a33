/// Phase definitions for a crawl run
///
/// A run moves `CollectingPages -> FetchingBooks -> Finalizing -> Done`. The only
/// other exit is `CollectingPages -> Aborted`, taken when no book links were found.
use std::fmt;

/// Represents the current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    /// Walking the catalog pages and collecting book links
    CollectingPages,

    /// Fetching books one after another
    FetchingBooks,

    /// Writing the aggregate output
    Finalizing,

    // ===== Terminal States =====
    /// Run finished and the aggregate was written
    Done,

    /// Run stopped before fetching any book
    Aborted,
}

impl RunPhase {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Returns true if the run may move from this phase to `next`
    pub fn can_transition_to(&self, next: RunPhase) -> bool {
        matches!(
            (self, next),
            (Self::CollectingPages, Self::FetchingBooks)
                | (Self::CollectingPages, Self::Aborted)
                | (Self::FetchingBooks, Self::Finalizing)
                | (Self::Finalizing, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CollectingPages => "collecting_pages",
            Self::FetchingBooks => "fetching_books",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
