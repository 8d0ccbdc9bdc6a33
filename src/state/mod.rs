//! State module for tracking run progress
//!
//! # Components
//!
//! - `RunPhase`: the phase the run coordinator is in, with its allowed transitions
//! - `FetchOutcome`: what happened to a single book
//! - `SkipReason`: why a book was left out of the aggregate

mod outcome;
mod run_phase;

// Re-export main types
pub use outcome::{FetchOutcome, SkipReason, SkippedBook};
pub use run_phase::RunPhase;
