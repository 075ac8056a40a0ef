use crate::error::FeedError;
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use url::Url;

/// A headline record that could not supply a usable URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedArticle {
    /// Position of the record in the `articles` list
    pub index: usize,
    pub reason: String,
}

/// URLs taken from a headline-search response of the form
/// `{"articles": [{"url": "...", ...}, ...]}`.
///
/// Records without a usable `url` are not silently dropped: they are listed
/// in `rejected` so callers can report them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlineFeed {
    pub urls: Vec<String>,
    pub rejected: Vec<RejectedArticle>,
}

impl HeadlineFeed {
    /// Load a feed from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FeedError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Parse a feed from a JSON string
    pub fn from_json(json: &str) -> Result<Self, FeedError> {
        let doc: Value = serde_json::from_str(json)?;
        let articles = doc
            .get("articles")
            .and_then(Value::as_array)
            .ok_or(FeedError::MissingArticles)?;

        let mut feed = HeadlineFeed::default();
        for (index, article) in articles.iter().enumerate() {
            match article_url(article) {
                Ok(url) => feed.urls.push(url),
                Err(reason) => {
                    ::log::warn!("Skipping article {}: {}", index, reason);
                    feed.rejected.push(RejectedArticle { index, reason });
                }
            }
        }

        ::log::info!(
            "Headline feed has {} usable URLs ({} rejected)",
            feed.urls.len(),
            feed.rejected.len()
        );
        Ok(feed)
    }
}

/// Pulls a trimmed, absolute http(s) URL out of one article record
fn article_url(article: &Value) -> Result<String, String> {
    let raw = match article.get("url") {
        None | Some(Value::Null) => return Err("missing 'url' field".to_string()),
        Some(Value::String(s)) => s.trim(),
        Some(other) => return Err(format!("'url' is not a string: {other}")),
    };

    if raw.is_empty() {
        return Err("'url' is empty".to_string());
    }

    let parsed = Url::parse(raw).map_err(|e| format!("invalid URL '{raw}': {e}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(raw.to_string()),
        scheme => Err(format!("unsupported scheme '{scheme}' in '{raw}'")),
    }
}
