//! Crawler module for catalog paging and book fetching
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - Page extraction for listing and book pages
//! - Catalog paging with last-page detection
//! - Availability resolution of book downloads
//! - Per-book fetching and overall run coordination

mod book_fetcher;
mod coordinator;
mod extractor;
mod fetcher;
mod paginator;
mod resolver;

pub use book_fetcher::BookFetcher;
pub use coordinator::{run_crawl, Coordinator, ProgressEvent, RunPlan};
pub use extractor::{
    extract_book_details, extract_book_links, extract_last_page_number, BookDetails,
};
pub use fetcher::{
    build_availability_client, build_http_client, fetch_bytes, fetch_text, HttpClients,
};
pub use paginator::{CatalogPaginator, CollectedLinks, PageFailure, PageRange};
pub use resolver::AvailabilityResolver;

use crate::config::Config;
use crate::output::RunReport;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Discover the last catalog page
/// 2. Collect book links from the configured page range
/// 3. Fetch every book, skipping the ones that fail
/// 4. Write `books_description.json`
pub async fn crawl(config: Config) -> Result<RunReport, CrawlError> {
    run_crawl(config).await
}
