//! Per-book fetching
//!
//! For one detail link this module:
//! 1. Fetches the detail page and extracts its metadata
//! 2. Works out destination paths (or the skip sentinel) for text and cover
//! 3. Resolves the text download link, failing for unavailable books
//! 4. Downloads the text and the cover that are not skipped
//! 5. Writes both files, only once every download succeeded
//!
//! Any failure turns into a skipped outcome; nothing is written for that book.

use crate::crawler::extractor::extract_book_details;
use crate::crawler::fetcher::{fetch_bytes, fetch_text, HttpClients};
use crate::crawler::resolver::AvailabilityResolver;
use crate::state::FetchOutcome;
use crate::storage::{
    sanitize_filename, write_image, write_text, AssetLocation, BookRecord, OutputLayout,
};
use crate::url::{BookId, SiteUrls};
use crate::CrawlError;
use std::fs;

/// Fetches single books
pub struct BookFetcher<'a> {
    clients: &'a HttpClients,
    site: &'a SiteUrls,
    layout: &'a OutputLayout,
}

impl<'a> BookFetcher<'a> {
    pub fn new(clients: &'a HttpClients, site: &'a SiteUrls, layout: &'a OutputLayout) -> Self {
        Self {
            clients,
            site,
            layout,
        }
    }

    /// Fetches the book behind a detail link
    ///
    /// Never fails: errors are classified into `FetchOutcome::Skipped`.
    pub async fn fetch(&self, book_url: &str) -> FetchOutcome {
        match self.try_fetch(book_url).await {
            Ok(record) => {
                tracing::debug!("Fetched '{}' by {}", record.name, record.author);
                FetchOutcome::Fetched(record)
            }
            Err(e) => FetchOutcome::skipped(book_url, &e),
        }
    }

    async fn try_fetch(&self, book_url: &str) -> Result<BookRecord, CrawlError> {
        let book_id = BookId::from_url(book_url)?;

        let detail_url = self.site.book_url(&book_id)?;
        let page = fetch_text(&self.clients.pages, detail_url.as_str()).await?;
        let details = extract_book_details(&page, self.site.base()).map_err(|source| {
            CrawlError::Extract {
                url: detail_url.to_string(),
                source,
            }
        })?;

        let name = sanitize_filename(&details.title);
        let text_location = self.layout.text_location(&name);
        let image_location = self.layout.image_location(&details.cover_url);

        let resolver = AvailabilityResolver::new(&self.clients.availability, self.site);
        let download_url = resolver.resolve_download_link(&book_id).await?;

        let text = match text_location.path() {
            Some(_) => Some(fetch_text(&self.clients.pages, download_url.as_str()).await?),
            None => None,
        };
        let cover = match image_location.path() {
            Some(_) => Some(fetch_bytes(&self.clients.pages, &details.cover_url).await?),
            None => None,
        };

        let mut saved_text = None;
        if let (AssetLocation::Saved(path), Some(text)) = (&text_location, &text) {
            write_text(path, text)?;
            saved_text = Some(path);
            tracing::debug!("Saved text of book {} to {}", book_id, path.display());
        }
        if let (AssetLocation::Saved(path), Some(cover)) = (&image_location, &cover) {
            if let Err(e) = write_image(path, cover) {
                // The book is skipped, so its text must not stay behind
                if let Some(text_path) = saved_text {
                    if let Err(cleanup) = fs::remove_file(text_path) {
                        tracing::warn!(
                            "Could not remove text {} of skipped book {}: {}",
                            text_path.display(),
                            book_id,
                            cleanup
                        );
                    }
                }
                return Err(e.into());
            }
            tracing::debug!("Saved cover of book {} to {}", book_id, path.display());
        }

        Ok(BookRecord {
            name,
            author: details.author,
            image: image_location,
            text: text_location,
            comments: details.comments,
            genres: details.genres,
        })
    }
}
