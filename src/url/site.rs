use crate::config::Config;
use crate::url::BookId;
use crate::{UrlError, UrlResult};
use url::Url;

/// Builds the URLs of one site
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base: Url,
    catalog: Url,
}

impl SiteUrls {
    /// Creates the URL builder from a base URL and a catalog path relative to it
    pub fn new(base_url: &str, catalog_path: &str) -> UrlResult<Self> {
        let mut base =
            Url::parse(base_url).map_err(|e| UrlError::Parse(format!("{}: {}", base_url, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let catalog = base
            .join(catalog_path.trim_start_matches('/'))
            .map_err(|e| UrlError::Parse(format!("{}: {}", catalog_path, e)))?;

        Ok(Self { base, catalog })
    }

    /// Creates the URL builder from the site section of the configuration
    pub fn from_config(config: &Config) -> UrlResult<Self> {
        Self::new(&config.site.base_url, &config.site.catalog_path)
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// The catalog root, which also carries the page-number markers
    pub fn catalog(&self) -> &Url {
        &self.catalog
    }

    /// URL of a numbered catalog page
    pub fn page_url(&self, page: u32) -> String {
        format!("{}{}", self.catalog, page)
    }

    /// URL of a book's detail page
    pub fn book_url(&self, id: &BookId) -> UrlResult<Url> {
        self.base
            .join(&format!("b{}/", id))
            .map_err(|e| UrlError::Parse(e.to_string()))
    }

    /// URL of the raw text endpoint queried for a book
    pub fn download_endpoint(&self, id: &BookId) -> UrlResult<Url> {
        let endpoint = self
            .base
            .join("txt.php")
            .map_err(|e| UrlError::Parse(e.to_string()))?;
        Url::parse_with_params(endpoint.as_str(), &[("id", id.as_str())])
            .map_err(|e| UrlError::Parse(e.to_string()))
    }
}
