use log::debug;
use scraper::Html;
use serde_json::{Map, Value};

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::fetch;
use crate::model::IngredientGroup;

mod duration;
mod json_ld;
mod microdata;

pub use self::json_ld::JsonLdScraper;
pub use self::microdata::MicrodataScraper;

/// The fixed set of accessors a recipe scraper answers.
///
/// Accessors return `Ok` with a possibly empty value when the page simply
/// does not carry a field; `Err` is reserved for data that is present but
/// unreadable. Callers treat any `Err` as a failure of the whole scrape.
pub trait RecipeScraper {
    fn host(&self) -> Result<String, ScrapeError>;
    fn title(&self) -> Result<String, ScrapeError>;
    /// Total time in minutes.
    fn total_time(&self) -> Result<Option<u32>, ScrapeError>;
    fn image(&self) -> Result<Option<String>, ScrapeError>;
    fn ingredients(&self) -> Result<Vec<String>, ScrapeError>;
    /// Ingredients partitioned by purpose. Sites without grouping markup get
    /// a single unlabeled group holding the full ingredient list.
    fn ingredient_groups(&self) -> Result<Vec<IngredientGroup>, ScrapeError> {
        Ok(vec![IngredientGroup {
            purpose: None,
            ingredients: self.ingredients()?,
        }])
    }
    /// All steps joined with newlines.
    fn instructions(&self) -> Result<String, ScrapeError> {
        Ok(self.instructions_list()?.join("\n"))
    }
    fn instructions_list(&self) -> Result<Vec<String>, ScrapeError>;
    fn yields(&self) -> Result<Option<String>, ScrapeError>;
    fn nutrients(&self) -> Result<Map<String, Value>, ScrapeError>;
}

/// Fetch a page and select a scraper for it.
pub fn scrape(url: &str, config: &ScrapeConfig) -> Result<Box<dyn RecipeScraper>, ScrapeError> {
    let host = host_of(url)?;
    let body = fetch::fetch_page(url, config)?;
    scrape_html(&host, &body)
}

/// Select a scraper for an already-fetched page.
///
/// Scrapers are tried in order: JSON-LD first, then microdata.
pub fn scrape_html(host: &str, body: &str) -> Result<Box<dyn RecipeScraper>, ScrapeError> {
    let document = Html::parse_document(body);

    if let Some(scraper) = JsonLdScraper::from_document(host, &document) {
        debug!("Using JSON-LD scraper for {}", host);
        return Ok(Box::new(scraper));
    }
    if let Some(scraper) = MicrodataScraper::from_document(host, &document) {
        debug!("Using microdata scraper for {}", host);
        return Ok(Box::new(scraper));
    }

    Err(ScrapeError::UnsupportedPage(host.to_string()))
}

fn host_of(url: &str) -> Result<String, ScrapeError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|err| ScrapeError::InvalidUrl(format!("{} ({})", url, err)))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| ScrapeError::InvalidUrl(url.to_string()))?;
    Ok(host.strip_prefix("www.").unwrap_or(host).to_string())
}
