//! Run coordinator - main crawl orchestration logic
//!
//! This module drives a whole run:
//! - Discovering the catalog's last page and resolving the page range
//! - Collecting book links from the catalog pages
//! - Fetching every book in catalog order, continuing past failed books
//! - Writing the aggregate description once, at the end

use crate::config::{validate, Config};
use crate::crawler::book_fetcher::BookFetcher;
use crate::crawler::fetcher::HttpClients;
use crate::crawler::paginator::{CatalogPaginator, PageRange};
use crate::output::{JsonOutputHandler, OutputHandler, RunReport};
use crate::state::{FetchOutcome, RunPhase, SkipReason, SkippedBook};
use crate::storage::OutputLayout;
use crate::url::SiteUrls;
use crate::CrawlError;
use chrono::{DateTime, Local};

/// Progress notifications emitted while a run fetches books
#[derive(Debug)]
pub enum ProgressEvent<'a> {
    /// Link collection finished; `total` books will be fetched
    BooksCollected { total: usize },

    /// One book was processed
    BookFinished {
        index: usize,
        url: &'a str,
        outcome: &'a FetchOutcome,
    },
}

type ProgressCallback = Box<dyn FnMut(ProgressEvent<'_>)>;

/// What a run would crawl, resolved against the live catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub last_page: u32,
    /// Range as configured (end page filled in by policy if missing)
    pub requested: PageRange,
    /// Range actually fetched; `None` if it starts past the last page
    pub effective: Option<PageRange>,
}

/// Main run coordinator structure
pub struct Coordinator {
    config: Config,
    site: SiteUrls,
    clients: HttpClients,
    layout: OutputLayout,
    output: Box<dyn OutputHandler>,
    phase: RunPhase,
    started_at: DateTime<Local>,
    progress: Option<ProgressCallback>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - Invalid configuration or HTTP client setup failure
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        validate(&config)?;

        let site = SiteUrls::from_config(&config)?;
        let clients = HttpClients::new(&config)?;
        let started_at = Local::now();
        let layout = OutputLayout::new(&config.output, &config.crawler, started_at);
        let output = Box::new(JsonOutputHandler::new(layout.description_path()));

        Ok(Self {
            config,
            site,
            clients,
            layout,
            output,
            phase: RunPhase::CollectingPages,
            started_at,
            progress: None,
        })
    }

    /// Replaces the JSON output handler
    pub fn with_output_handler(mut self, output: Box<dyn OutputHandler>) -> Self {
        self.output = output;
        self
    }

    /// Registers a callback for progress events
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: FnMut(ProgressEvent<'_>) + 'static,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn site(&self) -> &SiteUrls {
        &self.site
    }

    /// Discovers the last catalog page and resolves the page range, without fetching books
    pub async fn plan(&self) -> Result<RunPlan, CrawlError> {
        let paginator = CatalogPaginator::new(&self.clients.pages, &self.site);
        let last_page = paginator.discover_last_page().await?;
        let requested = PageRange::from_config(&self.config.crawler, last_page)?;
        Ok(RunPlan {
            last_page,
            requested,
            effective: requested.clamp_to(last_page),
        })
    }

    /// Runs the crawl
    ///
    /// Per-book failures are logged and recorded in the report; they never stop
    /// the run. The run fails only if the catalog cannot be read, the page range
    /// is unsatisfiable, no book link was collected, or the aggregate cannot be
    /// written.
    pub async fn run(&mut self) -> Result<RunReport, CrawlError> {
        if self.phase != RunPhase::CollectingPages {
            return Err(CrawlError::InvalidTransition {
                from: self.phase,
                to: RunPhase::CollectingPages,
            });
        }

        tracing::info!("Starting run against {}", self.site.catalog());

        let plan = match self.plan().await {
            Ok(plan) => plan,
            Err(e) => {
                tracing::error!("Cannot determine catalog bounds: {}", e);
                self.transition(RunPhase::Aborted)?;
                return Err(e);
            }
        };

        let collected = CatalogPaginator::new(&self.clients.pages, &self.site)
            .collect_book_links(plan.requested, plan.last_page)
            .await;

        if collected.links.is_empty() {
            tracing::error!(
                "No book links found for pages {} (catalog has {} pages), nothing to download",
                plan.requested,
                plan.last_page
            );
            self.transition(RunPhase::Aborted)?;
            return Err(CrawlError::EmptyResult);
        }

        self.layout.ensure_dirs()?;
        self.transition(RunPhase::FetchingBooks)?;

        let total = collected.links.len();
        tracing::info!("Fetching {} books", total);
        if let Some(callback) = self.progress.as_mut() {
            callback(ProgressEvent::BooksCollected { total });
        }

        let mut records = Vec::new();
        let mut skipped = Vec::new();
        {
            let fetcher = BookFetcher::new(&self.clients, &self.site, &self.layout);
            for (index, url) in collected.links.iter().enumerate() {
                let outcome = fetcher.fetch(url).await;

                if let Some(callback) = self.progress.as_mut() {
                    callback(ProgressEvent::BookFinished {
                        index,
                        url: url.as_str(),
                        outcome: &outcome,
                    });
                }

                match outcome {
                    FetchOutcome::Fetched(record) => records.push(record),
                    FetchOutcome::Skipped(book) => {
                        tracing::warn!("{}", skip_message(&book));
                        skipped.push(book);
                    }
                }
            }
        }

        self.transition(RunPhase::Finalizing)?;
        let description_path = self.output.write_books(&records)?;

        let report = RunReport {
            records,
            skipped,
            last_page: plan.last_page,
            range: plan.requested,
            pages_fetched: collected.pages_fetched,
            failed_pages: collected.failed_pages,
            boundary_exceeded: collected.boundary_exceeded,
            links_collected: total,
            description_path,
            started_at: self.started_at,
            finished_at: Local::now(),
        };

        self.transition(RunPhase::Done)?;

        tracing::info!(
            "Run completed: {} fetched, {} skipped in {}s",
            report.records.len(),
            report.skipped.len(),
            report.duration_seconds()
        );

        Ok(report)
    }

    fn transition(&mut self, next: RunPhase) -> Result<(), CrawlError> {
        if !self.phase.can_transition_to(next) {
            return Err(CrawlError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("Run phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}

fn skip_message(book: &SkippedBook) -> String {
    let what = match book.reason {
        SkipReason::Unavailable => "is not available for download",
        SkipReason::Transport => "could not be fetched",
        SkipReason::Extraction => "has an unreadable page",
        SkipReason::Io => "could not be saved",
    };
    format!("Skipping book {}: {} ({})", book.url, what, book.detail)
}

/// Runs a complete crawl with the given configuration
///
/// # Example
///
/// ```no_run
/// use tululu_fetch::config::load_config;
/// use tululu_fetch::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("tululu.toml"))?;
/// let report = run_crawl(config).await?;
/// println!("{} books fetched", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<RunReport, CrawlError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
