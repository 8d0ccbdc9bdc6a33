//! Availability resolver
//!
//! The site has no 404 for books without a downloadable text. Instead, the raw
//! text endpoint `txt.php?id=<id>` redirects to an unrelated page. Any redirect
//! at all means the book is unavailable, so the check uses a client that does not
//! follow redirects and looks at the first response only.

use crate::crawler::fetcher::{check_status, send_get};
use crate::url::{BookId, SiteUrls};
use crate::CrawlError;
use reqwest::header::LOCATION;
use reqwest::{Client, Response};
use url::Url;

/// Resolves the direct text download link of a book
///
/// `client` must not follow redirects (see `build_availability_client`).
pub struct AvailabilityResolver<'a> {
    client: &'a Client,
    site: &'a SiteUrls,
}

impl<'a> AvailabilityResolver<'a> {
    pub fn new(client: &'a Client, site: &'a SiteUrls) -> Self {
        Self { client, site }
    }

    /// Returns the URL the book text can be downloaded from
    ///
    /// The redirect check runs before the status check, and the redirect is never
    /// followed, so the response body of a redirect target is never read here.
    ///
    /// # Returns
    ///
    /// * `Ok(Url)` - URL of the text
    /// * `Err(CrawlError::Unavailable)` - The endpoint answered with a redirect
    /// * `Err(CrawlError::Transport | HttpStatus)` - The request failed
    pub async fn resolve_download_link(&self, book_id: &BookId) -> Result<Url, CrawlError> {
        let endpoint = self.site.download_endpoint(book_id)?;
        let response = send_get(self.client, &endpoint).await?;

        if response.status().is_redirection() {
            let redirected_to = redirect_target(&endpoint, &response);
            tracing::debug!(
                "Download endpoint for book {} redirected to {}",
                book_id,
                redirected_to
            );
            return Err(CrawlError::Unavailable {
                book_id: book_id.to_string(),
                redirected_to,
            });
        }

        check_status(&response)?;
        Ok(endpoint)
    }
}

/// Absolute `Location` of a redirect response, or the endpoint if it has none
fn redirect_target(endpoint: &Url, response: &Response) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|location| endpoint.join(location).ok())
        .unwrap_or_else(|| endpoint.clone())
        .to_string()
}
