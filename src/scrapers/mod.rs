pub mod batch;
pub mod fetcher;

#[cfg(test)]
pub(crate) mod tests;

pub use batch::BatchScraper;
pub use fetcher::PageFetcher;
