//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests returning text (pages, book texts) or bytes (covers)
//! - Mapping transport failures and non-success statuses to `CrawlError`
//!
//! There is no retry: a failed request is reported to the caller, which decides
//! whether the failure affects a page, a book, or the whole run.

use crate::config::Config;
use crate::CrawlError;
use reqwest::{redirect::Policy, Client, ClientBuilder, Response};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed for a single request
const MAX_REDIRECTS: usize = 10;

/// The two clients a run uses
///
/// `pages` follows redirects and fetches catalog pages, book pages, texts and
/// covers. `availability` never follows redirects, so the availability check
/// sees every redirect the text endpoint answers with, even one back to itself.
#[derive(Debug, Clone)]
pub struct HttpClients {
    pub pages: Client,
    pub availability: Client,
}

impl HttpClients {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            pages: build_http_client(config)?,
            availability: build_availability_client(config)?,
        })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration (user agent and timeout are used)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    client_builder(config)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .build()
}

/// Builds a client that returns 3xx responses instead of following them
pub fn build_availability_client(config: &Config) -> Result<Client, reqwest::Error> {
    client_builder(config).redirect(Policy::none()).build()
}

fn client_builder(config: &Config) -> ClientBuilder {
    Client::builder()
        .user_agent(config.user_agent_string())
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
}

/// Sends a GET request and returns the raw response
///
/// The status code is NOT checked here, so callers can inspect redirects first.
pub async fn send_get(client: &Client, url: &Url) -> Result<Response, CrawlError> {
    tracing::debug!("GET {}", url);
    client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| CrawlError::Transport {
            url: url.to_string(),
            source,
        })
}

/// Fails with `HttpStatus` unless the response has a success status
pub fn check_status(response: &Response) -> Result<(), CrawlError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(CrawlError::HttpStatus {
            url: response.url().to_string(),
            status: status.as_u16(),
        })
    }
}

/// Fetches a URL and returns its body as text
///
/// # Returns
///
/// * `Ok(String)` - Body of a 2xx response
/// * `Err(CrawlError::Transport)` - connection, timeout or body read failure
/// * `Err(CrawlError::HttpStatus)` - non-success status code
pub async fn fetch_text(client: &Client, url: &str) -> Result<String, CrawlError> {
    let url = Url::parse(url)?;
    let response = send_get(client, &url).await?;
    check_status(&response)?;

    response
        .text()
        .await
        .map_err(|source| CrawlError::Transport {
            url: url.to_string(),
            source,
        })
}

/// Fetches a URL and returns its body as raw bytes
pub async fn fetch_bytes(client: &Client, url: &Url) -> Result<Vec<u8>, CrawlError> {
    let response = send_get(client, url).await?;
    check_status(&response)?;

    let bytes = response
        .bytes()
        .await
        .map_err(|source| CrawlError::Transport {
            url: url.to_string(),
            source,
        })?;

    Ok(bytes.to_vec())
}
