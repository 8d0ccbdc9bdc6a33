//! Report of a finished run

use crate::crawler::{PageFailure, PageRange};
use crate::state::{SkipReason, SkippedBook};
use crate::storage::BookRecord;
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::path::PathBuf;

/// Everything a run produced, in catalog traversal order
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Records of fetched books, page ascending, page order within a page
    pub records: Vec<BookRecord>,

    /// Books that were left out, with the reason
    pub skipped: Vec<SkippedBook>,

    /// Last page of the catalog, as discovered at the start of the run
    pub last_page: u32,

    /// Page range that was requested
    pub range: PageRange,

    /// Pages whose links were collected
    pub pages_fetched: Vec<u32>,

    /// Catalog pages that failed
    pub failed_pages: Vec<PageFailure>,

    /// First requested page past the end of the catalog, if any
    pub boundary_exceeded: Option<u32>,

    /// Number of book links collected from the catalog
    pub links_collected: usize,

    /// Where the aggregate was written
    pub description_path: PathBuf,

    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl RunReport {
    /// Returns true if any book or catalog page was skipped
    pub fn had_failures(&self) -> bool {
        !self.skipped.is_empty() || !self.failed_pages.is_empty()
    }

    /// Number of skipped books per reason
    pub fn skipped_by_reason(&self) -> HashMap<SkipReason, usize> {
        let mut counts = HashMap::new();
        for skipped in &self.skipped {
            *counts.entry(skipped.reason).or_insert(0) += 1;
        }
        counts
    }

    /// Share of collected links that became records, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.links_collected == 0 {
            return 0.0;
        }
        (self.records.len() as f64 / self.links_collected as f64) * 100.0
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}
