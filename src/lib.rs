pub mod config;
pub mod error;
pub mod model;
pub mod scrapers;

mod fetch;

use log::debug;

pub use crate::config::ScrapeConfig;
pub use crate::error::ScrapeError;
pub use crate::model::{IngredientGroup, ScrapedRecipe};
pub use crate::scrapers::RecipeScraper;

/// Scrape a recipe page and return its structured data.
///
/// Performs a single blocking fetch; any failure to fetch, recognize, or
/// read the recipe comes back as a [`ScrapeError`].
pub fn extract_recipe(url: &str) -> Result<ScrapedRecipe, ScrapeError> {
    extract_recipe_with_config(url, &ScrapeConfig::default())
}

pub fn extract_recipe_with_config(
    url: &str,
    config: &ScrapeConfig,
) -> Result<ScrapedRecipe, ScrapeError> {
    let scraper = scrapers::scrape(url, config)?;
    let record = record_from_scraper(scraper.as_ref())?;
    debug!("{:#?}", record);
    Ok(record)
}

/// Copy a scraper's accessor outputs into a record.
///
/// Any accessor error aborts the whole extraction: the record is either
/// fully populated or not produced at all.
pub fn record_from_scraper(scraper: &dyn RecipeScraper) -> Result<ScrapedRecipe, ScrapeError> {
    Ok(ScrapedRecipe {
        host: scraper.host()?,
        title: scraper.title()?,
        total_time: scraper.total_time()?,
        image: scraper.image()?,
        ingredients: scraper.ingredients()?,
        ingredient_groups: scraper.ingredient_groups()?,
        instructions: scraper.instructions()?,
        instructions_list: scraper.instructions_list()?,
        yields: scraper.yields()?,
        nutrients: scraper.nutrients()?,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value};

    use super::*;

    /// Deterministic scraper with an optional poisoned accessor.
    struct StubScraper {
        groups: Vec<IngredientGroup>,
        fail_total_time: bool,
    }

    impl StubScraper {
        fn new() -> Self {
            Self {
                groups: vec![IngredientGroup {
                    purpose: Some("Sauce".to_string()),
                    ingredients: vec!["salt".to_string(), "oil".to_string()],
                }],
                fail_total_time: false,
            }
        }
    }

    impl RecipeScraper for StubScraper {
        fn host(&self) -> Result<String, ScrapeError> {
            Ok("example.com".to_string())
        }

        fn title(&self) -> Result<String, ScrapeError> {
            Ok("Stub Recipe".to_string())
        }

        fn total_time(&self) -> Result<Option<u32>, ScrapeError> {
            if self.fail_total_time {
                return Err(ScrapeError::Malformed("unreadable totalTime".to_string()));
            }
            Ok(Some(35))
        }

        fn image(&self) -> Result<Option<String>, ScrapeError> {
            Ok(None)
        }

        fn ingredients(&self) -> Result<Vec<String>, ScrapeError> {
            Ok(vec!["salt".to_string(), "oil".to_string()])
        }

        fn ingredient_groups(&self) -> Result<Vec<IngredientGroup>, ScrapeError> {
            Ok(self.groups.clone())
        }

        fn instructions_list(&self) -> Result<Vec<String>, ScrapeError> {
            Ok(vec!["Mix.".to_string(), "Serve.".to_string()])
        }

        fn yields(&self) -> Result<Option<String>, ScrapeError> {
            Ok(Some("2 servings".to_string()))
        }

        fn nutrients(&self) -> Result<Map<String, Value>, ScrapeError> {
            Ok(Map::new())
        }
    }

    #[test]
    fn test_record_carries_all_fields() {
        let record = record_from_scraper(&StubScraper::new()).unwrap();

        assert_eq!(record.host, "example.com");
        assert_eq!(record.title, "Stub Recipe");
        assert_eq!(record.total_time, Some(35));
        assert_eq!(record.image, None);
        assert_eq!(record.ingredients, vec!["salt", "oil"]);
        assert_eq!(record.instructions, "Mix.\nServe.");
        assert_eq!(record.instructions_list, vec!["Mix.", "Serve."]);
        assert_eq!(record.yields, Some("2 servings".to_string()));
        assert!(record.nutrients.is_empty());
    }

    #[test]
    fn test_accessor_error_aborts_extraction() {
        let mut stub = StubScraper::new();
        stub.fail_total_time = true;

        let result = record_from_scraper(&stub);
        assert!(matches!(result, Err(ScrapeError::Malformed(_))));
    }

    #[test]
    fn test_ingredient_groups_pass_through_in_order() {
        let mut stub = StubScraper::new();
        stub.groups = vec![
            IngredientGroup {
                purpose: Some("Sauce".to_string()),
                ingredients: vec!["salt".to_string(), "oil".to_string()],
            },
            IngredientGroup {
                purpose: Some("Topping".to_string()),
                ingredients: vec!["cheese".to_string()],
            },
        ];

        let record = record_from_scraper(&stub).unwrap();
        assert_eq!(record.ingredient_groups, stub.groups);
    }

    #[test]
    fn test_repeated_extraction_is_byte_identical() {
        let stub = StubScraper::new();
        let first = serde_json::to_string(&record_from_scraper(&stub).unwrap()).unwrap();
        let second = serde_json::to_string(&record_from_scraper(&stub).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
