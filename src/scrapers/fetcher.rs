use crate::browser::{Browser, BrowserPage};
use crate::config::{DelayRange, ScraperConfig, Viewport};
use crate::error::{BrowserError, ConfigError};
use crate::parsers;
use crate::results::PageResult;
use crate::utils;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

/// Why a single page could not be scraped
#[derive(Debug, thiserror::Error)]
enum FetchFailure {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("HTTP No response")]
    NoResponse,

    #[error(transparent)]
    Browser(#[from] BrowserError),
}

struct LoadedPage {
    title: String,
    content: String,
}

/// Fetches one URL at a time inside an existing browser.
///
/// Makes a single attempt per URL. Any failure is reported in the returned
/// [`PageResult`]; the page opened for the URL is closed before returning,
/// whatever happened while it was open.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    navigation_timeout: Duration,
    viewport: Viewport,
    settle: DelayRange,
}

impl PageFetcher {
    pub fn new(navigation_timeout: Duration) -> Self {
        Self {
            navigation_timeout,
            viewport: Viewport::default(),
            settle: DelayRange::DEFAULT_SETTLE,
        }
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            navigation_timeout: config.navigation_timeout(),
            viewport: config.viewport,
            settle: config.settle_range()?,
        })
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Pause after a successful load before the page is read
    pub fn with_settle_range(mut self, settle: DelayRange) -> Self {
        self.settle = settle;
        self
    }

    pub fn navigation_timeout(&self) -> Duration {
        self.navigation_timeout
    }

    /// Scrape `url` in a fresh page presenting `user_agent`
    pub async fn fetch<B: Browser>(&self, browser: &B, url: &str, user_agent: &str) -> PageResult {
        let url = url.trim();
        ::log::info!("Scraping: {}", url);

        let mut page = match browser.new_page(user_agent).await {
            Ok(page) => page,
            Err(e) => {
                ::log::error!("Error opening page for {}: {}", url, e);
                return PageResult::failed(url, e.to_string());
            }
        };

        let visit = AssertUnwindSafe(self.visit(&mut page, url))
            .catch_unwind()
            .await;

        if let Err(e) = page.close().await {
            ::log::warn!("Failed to close page for {}: {}", url, e);
        }

        match visit {
            Ok(Ok(loaded)) => {
                ::log::info!(
                    "Successfully scraped: {} ({} characters)",
                    url,
                    loaded.content.chars().count()
                );
                PageResult::success(url, loaded.title, loaded.content)
            }
            Ok(Err(failure)) => {
                match &failure {
                    FetchFailure::Status(_) | FetchFailure::NoResponse => {
                        ::log::warn!("Failed to load {}: {}", url, failure)
                    }
                    FetchFailure::Browser(e) => ::log::error!("Error scraping {}: {}", url, e),
                }
                PageResult::failed(url, failure.to_string())
            }
            Err(panic) => {
                let reason = format!("unexpected fault: {}", panic_message(panic.as_ref()));
                ::log::error!("Error scraping {}: {}", url, reason);
                PageResult::failed(url, reason)
            }
        }
    }

    async fn visit<P: BrowserPage>(&self, page: &mut P, url: &str) -> Result<LoadedPage, FetchFailure> {
        page.set_viewport(self.viewport).await?;

        match page.goto(url, self.navigation_timeout).await? {
            Some(200) => {}
            Some(status) => return Err(FetchFailure::Status(status)),
            None => return Err(FetchFailure::NoResponse),
        }

        // Give client-side rendering a moment to settle
        tokio::time::sleep(utils::random_delay(self.settle)).await;

        let html = page.content().await?;
        let title = page.title().await?;

        Ok(LoadedPage {
            title,
            content: parsers::extract_text(&html),
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "panic while scraping"
    }
}
