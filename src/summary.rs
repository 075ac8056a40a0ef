use crate::results::{Article, FailedUrl, PageResult, ScrapeStats, ScrapeSummary};

/// Separator placed between article blocks in the combined text
pub const ARTICLE_SEPARATOR: &str = "\n\n--- ARTICLE SEPARATOR ---\n\n";

/// Reduces page results into a [`ScrapeSummary`].
///
/// Successful pages become article blocks of the form
/// `Title: <title>\nURL: <url>\nContent: <content>` joined by
/// [`ARTICLE_SEPARATOR`] in input order. Failed pages are listed in
/// `failures`. Pure and deterministic.
pub fn summarize(results: &[PageResult]) -> ScrapeSummary {
    let mut articles = Vec::new();
    let mut failures = Vec::new();

    for result in results {
        if result.is_success() {
            articles.push(Article {
                title: result.title.clone(),
                url: result.url.clone(),
                content: result.content.clone(),
            });
        } else {
            failures.push(FailedUrl {
                url: result.url.clone(),
                error: result.error.clone().unwrap_or_default(),
            });
        }
    }

    let combined_text = articles
        .iter()
        .map(article_block)
        .collect::<Vec<_>>()
        .join(ARTICLE_SEPARATOR);

    let stats = ScrapeStats {
        total: results.len(),
        successful: articles.len(),
        failed: failures.len(),
        total_characters: articles.iter().map(|a| a.content.chars().count()).sum(),
    };

    ScrapeSummary {
        combined_text,
        articles,
        stats,
        failures,
    }
}

fn article_block(article: &Article) -> String {
    format!(
        "Title: {}\nURL: {}\nContent: {}",
        article.title, article.url, article.content
    )
}
