//! Browser automation seams.
//!
//! A [`BrowserLauncher`] starts one [`Browser`] per batch; the browser hands
//! out isolated [`BrowserPage`]s, one per URL. The production implementation
//! drives a WebDriver server ([`webdriver`]); tests substitute in-memory fakes.
#![allow(async_fn_in_trait)]

pub mod webdriver;

use crate::config::Viewport;
use crate::error::BrowserError;
use std::time::Duration;

pub use webdriver::{WebDriverBrowser, WebDriverLauncher, WebDriverPage};

/// Starts a browser instance
pub trait BrowserLauncher {
    type Browser: Browser;

    async fn launch(&self) -> Result<Self::Browser, BrowserError>;
}

/// A live browser instance owned by one batch
pub trait Browser {
    type Page: BrowserPage;

    /// Open a new isolated page presenting the given user agent
    async fn new_page(&self, user_agent: &str) -> Result<Self::Page, BrowserError>;

    /// Shut the browser down
    async fn close(self) -> Result<(), BrowserError>;
}

/// A single page (tab) inside a browser
pub trait BrowserPage {
    async fn set_viewport(&mut self, viewport: Viewport) -> Result<(), BrowserError>;

    /// Navigate and wait until the DOM is parsed. Returns the HTTP status of
    /// the main document, if the browser reported one.
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<Option<u16>, BrowserError>;

    /// The fully rendered markup
    async fn content(&mut self) -> Result<String, BrowserError>;

    async fn title(&mut self) -> Result<String, BrowserError>;

    async fn close(self) -> Result<(), BrowserError>;
}
