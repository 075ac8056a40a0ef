use crate::browser::{Browser, BrowserLauncher};
use crate::config::{DelayRange, ScraperConfig};
use crate::error::ScrapeError;
use crate::results::PageResult;
use crate::scrapers::fetcher::PageFetcher;
use crate::utils;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Scrapes a list of URLs one after another through a single browser.
///
/// The browser is launched at the start of [`BatchScraper::scrape`] and
/// closed before it returns. URLs are fetched strictly in order with a
/// random pause between consecutive requests. A failing URL yields a failed
/// [`PageResult`] and the batch moves on; only a browser that cannot be
/// launched fails the whole call.
pub struct BatchScraper<L> {
    launcher: L,
    fetcher: PageFetcher,
    delay: DelayRange,
    user_agents: Vec<String>,
    cancel: Option<CancellationToken>,
}

impl<L: BrowserLauncher> BatchScraper<L> {
    /// Create a batch scraper from a validated configuration
    pub fn new(launcher: L, config: &ScraperConfig) -> Result<Self, ScrapeError> {
        config.validate()?;

        Ok(Self {
            launcher,
            fetcher: PageFetcher::from_config(config)?,
            delay: config.delay_range()?,
            user_agents: config.user_agents.clone(),
            cancel: None,
        })
    }

    /// Override the pause between consecutive URLs
    pub fn with_delay_range(mut self, delay: DelayRange) -> Self {
        self.delay = delay;
        self
    }

    /// Override the fetcher, e.g. to change the navigation timeout
    pub fn with_fetcher(mut self, fetcher: PageFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Stop between URLs once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Scrape every URL in order.
    ///
    /// Returns one result per URL, in input order. If the batch is cancelled,
    /// the results collected so far are returned.
    pub async fn scrape(&self, urls: &[String]) -> Result<Vec<PageResult>, ScrapeError> {
        ::log::info!("Found {} URLs to scrape", urls.len());
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        let browser = self.launcher.launch().await.map_err(|e| {
            ::log::error!("Failed to launch browser: {}", e);
            ScrapeError::Launch(e)
        })?;

        let outcome = AssertUnwindSafe(self.scrape_with(&browser, urls))
            .catch_unwind()
            .await;

        if let Err(e) = browser.close().await {
            ::log::warn!("Failed to close browser: {}", e);
        }

        let results = match outcome {
            Ok(results) => results,
            Err(panic) => std::panic::resume_unwind(panic),
        };

        let successful = results.iter().filter(|r| r.is_success()).count();
        ::log::info!(
            "Scraping complete! {}/{} URLs successful",
            successful,
            urls.len()
        );

        Ok(results)
    }

    async fn scrape_with(&self, browser: &L::Browser, urls: &[String]) -> Vec<PageResult> {
        let mut results = Vec::with_capacity(urls.len());

        for (i, url) in urls.iter().enumerate() {
            if self.is_cancelled() {
                ::log::info!("Scraping cancelled after {} of {} URLs", i, urls.len());
                break;
            }

            let user_agent = utils::pick_user_agent(&self.user_agents).unwrap_or_default();
            results.push(self.fetcher.fetch(browser, url, user_agent).await);

            // Pause between requests (except after the last one)
            if i + 1 < urls.len() {
                let delay = utils::random_delay(self.delay);
                ::log::info!(
                    "Waiting {:.1} seconds before next request...",
                    delay.as_secs_f64()
                );
                if !self.pause(delay).await {
                    ::log::info!("Scraping cancelled after {} of {} URLs", i + 1, urls.len());
                    break;
                }
            }
        }

        results
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|token| token.is_cancelled())
    }

    /// Sleep for `delay`; returns false if cancelled first
    async fn pause(&self, delay: Duration) -> bool {
        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => true,
                    _ = token.cancelled() => false,
                }
            }
            None => {
                tokio::time::sleep(delay).await;
                true
            }
        }
    }
}
