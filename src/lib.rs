// Re-export modules
pub mod browser;
pub mod config;
pub mod error;
pub mod feed;
pub mod parsers;
pub mod results;
pub mod scrapers;
pub mod summary;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::ScraperConfig;
pub use error::{BrowserError, ConfigError, DigestError, FeedError, ScrapeError};
pub use feed::HeadlineFeed;
pub use results::{PageResult, PageStatus, ScrapeSummary};
pub use scrapers::{BatchScraper, PageFetcher};
pub use summary::summarize;

use browser::{BrowserLauncher, WebDriverLauncher};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Where the URLs of a digest come from
#[derive(Debug, Clone)]
enum Source {
    FeedFile(PathBuf),
    Urls(Vec<String>),
}

/// Builder for a full run: headline feed -> browser scrape -> summary.
///
/// ```no_run
/// # async fn demo() -> Result<(), headline_scraper::DigestError> {
/// use headline_scraper::{Digest, ScraperConfig};
///
/// let summary = Digest::new(ScraperConfig::default())
///     .with_feed_file("news_raw.json")
///     .run()
///     .await?;
/// println!("{}", summary.combined_text);
/// # Ok(())
/// # }
/// ```
pub struct Digest {
    config: ScraperConfig,
    source: Option<Source>,
    cancel: Option<CancellationToken>,
}

impl Digest {
    /// Create a new Digest builder with the given configuration
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            config,
            source: None,
            cancel: None,
        }
    }

    /// Read URLs from a headline feed file (`{"articles": [{"url": ...}]}`)
    pub fn with_feed_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(Source::FeedFile(path.into()));
        self
    }

    /// Scrape an explicit list of URLs
    pub fn with_urls(mut self, urls: Vec<String>) -> Self {
        self.source = Some(Source::Urls(urls));
        self
    }

    /// Stop between URLs once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Run against the configured WebDriver server
    pub async fn run(self) -> Result<ScrapeSummary, DigestError> {
        let launcher = WebDriverLauncher::from_config(&self.config);
        self.run_with(launcher).await
    }

    /// Run with a specific browser launcher
    pub async fn run_with<L: BrowserLauncher>(self, launcher: L) -> Result<ScrapeSummary, DigestError> {
        let urls = match self.source {
            Some(Source::FeedFile(path)) => HeadlineFeed::from_file(path)?.urls,
            Some(Source::Urls(urls)) => urls,
            None => return Err(DigestError::NoFeed),
        };

        let mut scraper = BatchScraper::new(launcher, &self.config)?;
        if let Some(token) = self.cancel {
            scraper = scraper.with_cancellation(token);
        }

        let results = scraper.scrape(&urls).await?;
        Ok(summarize(&results))
    }
}
