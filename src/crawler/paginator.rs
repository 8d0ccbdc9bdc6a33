//! Catalog paginator
//!
//! Walks the numbered listing pages of the genre catalog and collects book
//! detail links in traversal order. The last page is discovered from the
//! catalog itself before any page is requested, and no page past it is fetched.

use crate::config::{CrawlerConfig, EndPagePolicy};
use crate::crawler::extractor::{extract_book_links, extract_last_page_number};
use crate::crawler::fetcher::fetch_text;
use crate::url::SiteUrls;
use crate::{ConfigError, CrawlError};
use reqwest::Client;
use std::fmt;

/// Half-open range of catalog pages, `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    start: u32,
    end: u32,
}

impl PageRange {
    /// Creates a range; `start` must be at least 1 and smaller than `end`
    pub fn new(start: u32, end: u32) -> Result<Self, ConfigError> {
        if start < 1 {
            return Err(ConfigError::Validation(format!(
                "start page must be >= 1, got {}",
                start
            )));
        }
        if end <= start {
            return Err(ConfigError::Validation(format!(
                "page range {}..{} is empty",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Resolves the configured range against the discovered last page
    ///
    /// A missing end page is filled in from the end-page policy. A configured end
    /// page is kept as is; pages past `last_page` are cut off while paginating.
    pub fn from_config(config: &CrawlerConfig, last_page: u32) -> Result<Self, ConfigError> {
        let end = match (config.end_page, config.end_page_policy) {
            (Some(end), _) => Some(end),
            (None, EndPagePolicy::ThroughLast) => last_page.max(config.start_page).checked_add(1),
            (None, EndPagePolicy::Single) => config.start_page.checked_add(1),
        };
        let end = end.ok_or_else(|| {
            ConfigError::Validation(format!(
                "start page {} leaves no room for an end page",
                config.start_page
            ))
        })?;
        Self::new(config.start_page, end)
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    /// First page NOT included in the range
    pub fn end(&self) -> u32 {
        self.end
    }

    /// The range with its end cut to `last_page`; `None` if nothing is left
    pub fn clamp_to(&self, last_page: u32) -> Option<Self> {
        let end = self.end.min(last_page.saturating_add(1));
        (self.start < end).then_some(Self {
            start: self.start,
            end,
        })
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A catalog page that could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub page: u32,
    pub url: String,
    pub error: String,
}

/// Links collected from the catalog, with accounting
#[derive(Debug, Clone, Default)]
pub struct CollectedLinks {
    /// Detail links, page ascending, page order within a page
    pub links: Vec<String>,
    /// Pages whose links were collected
    pub pages_fetched: Vec<u32>,
    /// Pages that failed to fetch or extract
    pub failed_pages: Vec<PageFailure>,
    /// First requested page beyond the catalog's last page, if the range went past it
    pub boundary_exceeded: Option<u32>,
}

/// Iterates catalog pages and collects book links
pub struct CatalogPaginator<'a> {
    client: &'a Client,
    site: &'a SiteUrls,
}

impl<'a> CatalogPaginator<'a> {
    pub fn new(client: &'a Client, site: &'a SiteUrls) -> Self {
        Self { client, site }
    }

    /// Fetches the catalog root and reads the number of its last page
    ///
    /// # Returns
    ///
    /// * `Ok(u32)` - The last page number
    /// * `Err(CrawlError::Transport | HttpStatus)` - Catalog unreachable
    /// * `Err(CrawlError::Extract)` - No page markers on the catalog page
    pub async fn discover_last_page(&self) -> Result<u32, CrawlError> {
        let url = self.site.catalog().as_str();
        let page = fetch_text(self.client, url).await?;
        let last_page = extract_last_page_number(&page).map_err(|source| {
            CrawlError::Extract {
                url: url.to_string(),
                source,
            }
        })?;
        tracing::info!("Catalog {} has {} pages", url, last_page);
        Ok(last_page)
    }

    /// Collects links from every page of `range` up to `last_page`
    ///
    /// `last_page` comes from `discover_last_page`, called once before paging.
    /// Failing pages are logged and recorded, and paging continues with the next
    /// one. Reaching a page beyond `last_page` stops paging; what was collected
    /// so far is kept.
    pub async fn collect_book_links(&self, range: PageRange, last_page: u32) -> CollectedLinks {
        let mut collected = CollectedLinks::default();

        for page in range.start()..range.end() {
            if page > last_page {
                tracing::warn!(
                    "Page {} is past the last catalog page {}, stopping",
                    page,
                    last_page
                );
                collected.boundary_exceeded = Some(page);
                break;
            }

            let url = self.site.page_url(page);
            match self.fetch_page_links(&url).await {
                Ok(links) => {
                    tracing::debug!("Page {}: {} book links", page, links.len());
                    collected.links.extend(links);
                    collected.pages_fetched.push(page);
                }
                Err(e) => {
                    tracing::warn!("Skipping catalog page {} ({}): {}", page, url, e);
                    collected.failed_pages.push(PageFailure {
                        page,
                        url,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Collected {} book links from {} pages ({} failed)",
            collected.links.len(),
            collected.pages_fetched.len(),
            collected.failed_pages.len()
        );

        collected
    }

    async fn fetch_page_links(&self, url: &str) -> Result<Vec<String>, CrawlError> {
        let page = fetch_text(self.client, url).await?;
        extract_book_links(&page, self.site.base()).map_err(|source| CrawlError::Extract {
            url: url.to_string(),
            source,
        })
    }
}
