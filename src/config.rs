use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Browser window size used for every page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Longest pause accepted between requests or after a page load
pub const MAX_DELAY_SECS: f64 = 3600.0;

/// Inclusive range of seconds to wait, drawn uniformly.
///
/// Only built through [`DelayRange::new`], so the bounds are always finite,
/// non-negative, ordered and at most [`MAX_DELAY_SECS`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayRange {
    min_secs: f64,
    max_secs: f64,
}

impl DelayRange {
    /// Post-load pause used when none is configured
    pub const DEFAULT_SETTLE: DelayRange = DelayRange {
        min_secs: 1.0,
        max_secs: 3.0,
    };

    /// Create a range, rejecting negative, non-finite, oversized or inverted bounds
    pub fn new(min_secs: f64, max_secs: f64) -> Result<Self, ConfigError> {
        if !(min_secs.is_finite() && max_secs.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "delay bounds must be finite, got {min_secs}..{max_secs}"
            )));
        }
        if min_secs < 0.0 || max_secs < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "delay bounds must be non-negative, got {min_secs}..{max_secs}"
            )));
        }
        if min_secs > max_secs {
            return Err(ConfigError::Invalid(format!(
                "minimum delay {min_secs}s exceeds maximum {max_secs}s"
            )));
        }
        if max_secs > MAX_DELAY_SECS {
            return Err(ConfigError::Invalid(format!(
                "maximum delay {max_secs}s exceeds the {MAX_DELAY_SECS}s limit"
            )));
        }
        Ok(Self { min_secs, max_secs })
    }

    /// A range that never waits
    pub fn zero() -> Self {
        Self {
            min_secs: 0.0,
            max_secs: 0.0,
        }
    }

    pub fn min_secs(&self) -> f64 {
        self.min_secs
    }

    pub fn max_secs(&self) -> f64 {
        self.max_secs
    }
}

/// Configuration for a scraping run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a visible window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Lower bound of the pause between two URLs
    #[serde(default = "default_min_delay_secs")]
    pub min_delay_secs: f64,

    /// Upper bound of the pause between two URLs
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: f64,

    /// Navigation timeout in milliseconds
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// Lower bound of the pause after a successful load, before reading the page
    #[serde(default = "default_settle_min_secs")]
    pub settle_min_secs: f64,

    /// Upper bound of the post-load pause
    #[serde(default = "default_settle_max_secs")]
    pub settle_max_secs: f64,

    #[serde(default)]
    pub viewport: Viewport,

    /// Pool of user-agent strings; one is picked at random per page
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_min_delay_secs() -> f64 {
    2.0
}

fn default_max_delay_secs() -> f64 {
    5.0
}

fn default_navigation_timeout_ms() -> u64 {
    30_000
}

fn default_settle_min_secs() -> f64 {
    1.0
}

fn default_settle_max_secs() -> f64 {
    3.0
}

/// Realistic desktop browser signatures
pub fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.4; rv:125.0) Gecko/20100101 Firefox/125.0",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            min_delay_secs: default_min_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            settle_min_secs: default_settle_min_secs(),
            settle_max_secs: default_settle_max_secs(),
            viewport: Viewport::default(),
            user_agents: default_user_agents(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Override the WebDriver URL with the `WEBDRIVER_URL` environment variable if set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }

    /// Check that the settings describe a runnable scrape
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.delay_range()?;
        self.settle_range()?;
        if self.navigation_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "navigation timeout must be greater than zero".to_string(),
            ));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "viewport must be non-empty, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        if self.user_agents.iter().all(|ua| ua.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "user agent pool is empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn delay_range(&self) -> Result<DelayRange, ConfigError> {
        DelayRange::new(self.min_delay_secs, self.max_delay_secs)
    }

    pub fn settle_range(&self) -> Result<DelayRange, ConfigError> {
        DelayRange::new(self.settle_min_secs, self.settle_max_secs)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }
}
