//! Output module for the aggregate description and run reports
//!
//! This module handles:
//! - Writing `books_description.json` once, at the end of a run
//! - The run report returned by the coordinator
//! - Printing a human-readable summary of a run

mod json;
mod report;
pub mod stats;
mod traits;

pub use json::JsonOutputHandler;
pub use report::RunReport;
pub use stats::{print_report, summary_line};
pub use traits::{OutputError, OutputHandler, OutputResult};
