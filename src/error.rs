use thiserror::Error;

/// Errors that can occur while scraping a recipe page
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Failed to fetch the page
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// URL has no parseable host component
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No scraper recognized a recipe on the page
    #[error("No recipe found on {0}")]
    UnsupportedPage(String),

    /// A recipe was found but one of its fields could not be read
    #[error("Malformed recipe data: {0}")]
    Malformed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
