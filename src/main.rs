use clap::Parser;
use headline_scraper::{Digest, ScraperConfig};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

mod args;
use args::{Args, OutputFormat};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    ::log::info!("Scraping headline feed {}", args.feed.display());
    ::log::info!("Using WebDriver at {}", config.webdriver_url);

    // Ctrl-C stops the batch between URLs; what was collected is still printed
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ::log::warn!("Interrupted, finishing the current page");
            on_interrupt.cancel();
        }
    });

    let start_time = std::time::Instant::now();
    let summary = match Digest::new(config)
        .with_feed_file(&args.feed)
        .with_cancellation(cancel)
        .run()
        .await
    {
        Ok(summary) => summary,
        Err(e) => {
            ::log::error!("Scraping failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for failure in &summary.failures {
        ::log::warn!("Failed: {} ({})", failure.url, failure.error);
    }
    ::log::info!(
        "Scraped {}/{} articles ({} characters) in {:.2} seconds",
        summary.stats.successful,
        summary.stats.total,
        summary.stats.total_characters,
        start_time.elapsed().as_secs_f64()
    );

    match args.format {
        OutputFormat::Text => println!("{}", summary.combined_text),
        OutputFormat::Json => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                ::log::error!("Failed to serialize summary: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}

/// Config file (or defaults), then environment, then command-line overrides
fn load_config(args: &Args) -> Result<ScraperConfig, headline_scraper::ConfigError> {
    let mut config = match &args.config {
        Some(path) => ScraperConfig::from_file(path)?,
        None => ScraperConfig::default(),
    }
    .with_env_overrides();

    if let Some(url) = &args.webdriver_url {
        config.webdriver_url = url.clone();
    }
    if let Some(min) = args.min_delay {
        config.min_delay_secs = min;
    }
    if let Some(max) = args.max_delay {
        config.max_delay_secs = max;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.navigation_timeout_ms = timeout_ms;
    }
    if args.headed {
        config.headless = false;
    }

    config.validate()?;
    Ok(config)
}
