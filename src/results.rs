use serde::{Deserialize, Serialize};

/// Outcome of a single page fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Success,
    Failed,
}

/// One record per URL attempted. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// URL of the page, as supplied (trimmed)
    pub url: String,

    pub status: PageStatus,

    /// Title of the page, empty if not retrieved
    pub title: String,

    /// Cleaned text content, empty on failure
    pub content: String,

    /// Failure cause, present only when `status` is `Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageResult {
    /// A successfully scraped page
    pub fn success(url: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: PageStatus::Success,
            title: title.into(),
            content: content.into(),
            error: None,
        }
    }

    /// A page that could not be scraped
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: PageStatus::Failed,
            title: String::new(),
            content: String::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PageStatus::Success
    }
}

/// A successfully scraped article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub content: String,
}

/// A URL that could not be scraped, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedUrl {
    pub url: String,
    pub error: String,
}

/// Counts over a batch of page results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Characters of cleaned content across successful pages
    pub total_characters: usize,
}

/// Everything a downstream summarizer needs from one scraping run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeSummary {
    pub combined_text: String,
    pub articles: Vec<Article>,
    pub stats: ScrapeStats,
    pub failures: Vec<FailedUrl>,
}
