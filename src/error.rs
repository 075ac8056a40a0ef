use std::time::Duration;
use thiserror::Error;

/// Errors raised by the browser layer
#[derive(Debug, Error)]
pub enum BrowserError {
    /// No WebDriver endpoint accepted a new session
    #[error("failed to connect to WebDriver at {url}: {reason}")]
    Connect { url: String, reason: String },

    /// A WebDriver command failed
    #[error(transparent)]
    WebDriver(#[from] fantoccini::error::CmdError),

    /// Navigation did not finish within the allotted time
    #[error("navigation timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// Failure reported by a browser implementation that does not speak
    /// WebDriver (custom [`Browser`](crate::browser::Browser) backends)
    #[error("{0}")]
    Other(String),
}

/// Batch-level failures. Per-URL problems never surface here.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The browser could not be started, so no result is possible
    #[error("browser failed to launch: {0}")]
    Launch(#[source] BrowserError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors loading or validating a scraper configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors reading a headline feed
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read headline feed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse headline feed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("headline feed has no 'articles' list")]
    MissingArticles,
}

/// Errors from the end-to-end digest run
#[derive(Debug, Error)]
pub enum DigestError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error("no headline feed was provided")]
    NoFeed,
}
