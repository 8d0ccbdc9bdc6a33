use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for tululu-fetch
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Location of the site and of the genre catalog on it
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root of the site; book pages, covers and downloads are resolved against it
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Path of the genre listing, relative to the base URL
    #[serde(rename = "catalog-path", default = "default_catalog_path")]
    pub catalog_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            catalog_path: default_catalog_path(),
        }
    }
}

/// What the end of the page range is when no end page is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndPagePolicy {
    /// Crawl through the last page of the catalog
    #[default]
    ThroughLast,
    /// Crawl only the start page
    Single,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// First catalog page to crawl (1-based)
    #[serde(rename = "start-page", default = "default_start_page")]
    pub start_page: u32,

    /// Page to stop before (exclusive); clamped to the catalog's last page
    #[serde(rename = "end-page", default)]
    pub end_page: Option<u32>,

    #[serde(rename = "end-page-policy", default)]
    pub end_page_policy: EndPagePolicy,

    /// Timeout for a single HTTP request (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Do not download cover images
    #[serde(rename = "skip-images", default)]
    pub skip_images: bool,

    /// Do not download book texts
    #[serde(rename = "skip-texts", default)]
    pub skip_texts: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_page: default_start_page(),
            end_page: None,
            end_page_policy: EndPagePolicy::default(),
            request_timeout_secs: default_timeout(),
            skip_images: false,
            skip_texts: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Folder that receives `books/` and `images/`
    #[serde(rename = "dest-folder", default)]
    pub dest_folder: PathBuf,

    /// Separate folder for `books_description.json` (defaults to `<dest-folder>/json`)
    #[serde(rename = "json-folder", default)]
    pub json_folder: Option<PathBuf>,

    /// Prefix saved file names with the run's start time
    #[serde(rename = "timestamp-filenames", default)]
    pub timestamp_filenames: bool,
}

impl Config {
    /// Full URL of the genre catalog, e.g. `https://tululu.org/l55/`
    pub fn catalog_url(&self) -> String {
        let base = if self.site.base_url.ends_with('/') {
            self.site.base_url.clone()
        } else {
            format!("{}/", self.site.base_url)
        };
        format!("{}{}", base, self.site.catalog_path.trim_start_matches('/'))
    }

    /// User agent header value
    pub fn user_agent_string(&self) -> String {
        format!(
            "{}/{}",
            self.user_agent.crawler_name, self.user_agent.crawler_version
        )
    }
}

fn default_base_url() -> String {
    "https://tululu.org/".to_string()
}

fn default_catalog_path() -> String {
    "l55/".to_string()
}

fn default_start_page() -> u32 {
    1
}

fn default_timeout() -> u64 {
    30
}

fn default_crawler_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
