//! tululu-fetch: a catalog crawler for tululu.org
//!
//! This crate walks the numbered listing pages of one genre, resolves each book's
//! download link, saves the book text and cover, and writes a JSON description of
//! everything it fetched.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Book {book_id} is not available for download (redirected to {redirected_to})")]
    Unavailable {
        book_id: String,
        redirected_to: String,
    },

    #[error("No book links found in the requested page range, nothing to download")]
    EmptyResult,

    #[error("Failed to extract data from {url}: {source}")]
    Extract { url: String, source: ExtractError },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid run transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RunPhase,
        to: state::RunPhase,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised when page markup does not have the expected shape
///
/// The site layout is fixed, so a missing element means the layout changed and the
/// page cannot be interpreted. Extraction never silently returns empty results.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid CSS selector '{0}'")]
    InvalidSelector(&'static str),

    #[error("No element matches selector '{0}'")]
    MissingElement(&'static str),

    #[error("Element '{selector}' has no '{attr}' attribute")]
    MissingAttribute {
        selector: &'static str,
        attr: &'static str,
    },

    #[error("Page number '{0}' is not a number")]
    InvalidPageNumber(String),

    #[error("Title '{0}' is not in 'name :: author' form")]
    MalformedTitle(String),

    #[error("Invalid link '{href}': {source}")]
    InvalidLink {
        href: String,
        source: ::url::ParseError,
    },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("URL has no book identifier: {0}")]
    MissingBookId(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for extraction operations
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Coordinator};
pub use output::RunReport;
pub use state::{FetchOutcome, RunPhase, SkipReason};
pub use storage::{AssetLocation, BookRecord};
pub use url::{BookId, SiteUrls};
