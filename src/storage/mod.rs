//! Storage module for the files a run produces
//!
//! This module handles everything that touches the output folders:
//! - The per-book metadata record and its JSON shape
//! - Destination paths for texts, covers and the JSON description
//! - File name sanitization and the optional timestamp naming policy
//! - Create-or-overwrite writes of downloaded texts and images

mod filename;
mod layout;
mod record;

pub use filename::{filename_from_url, sanitize_filename};
pub use layout::{write_image, write_text, OutputLayout, DESCRIPTION_FILE};
pub use record::{AssetLocation, BookRecord, NOT_DOWNLOADED};
