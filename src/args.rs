use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "headline-scraper")]
#[command(about = "Scrapes the articles behind a headline feed and prints text ready for summarization")]
#[command(version)]
pub struct Args {
    /// Headline feed JSON ({"articles": [{"url": ...}, ...]})
    #[arg(default_value = "news_raw.json")]
    pub feed: PathBuf,

    /// Scraper configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (overrides config and WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Minimum seconds to wait between requests
    #[arg(long)]
    pub min_delay: Option<f64>,

    /// Maximum seconds to wait between requests
    #[arg(long)]
    pub max_delay: Option<f64>,

    /// Navigation timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Combined article text only
    Text,
    /// Full summary with stats and failures
    Json,
}
