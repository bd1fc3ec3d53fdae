use log::debug;
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};

use super::{duration, RecipeScraper};
use crate::error::ScrapeError;

/// Scraper backed by schema.org microdata (`itemscope`/`itemprop` markup).
///
/// Properties are read once at construction; time values stay raw so that an
/// unreadable duration surfaces from the accessor, not from recognition.
pub struct MicrodataScraper {
    host: String,
    title: Option<String>,
    image: Option<String>,
    total_time: Option<String>,
    prep_time: Option<String>,
    cook_time: Option<String>,
    ingredients: Vec<String>,
    instructions: Vec<String>,
    yields: Option<String>,
    nutrients: Map<String, Value>,
}

impl MicrodataScraper {
    pub fn from_document(host: &str, document: &Html) -> Option<Self> {
        let container = find_recipe_container(document)?;

        let ingredients = {
            let mut items = prop_list(container, "recipeIngredient");
            if items.is_empty() {
                items = prop_list(container, "ingredients");
            }
            items
        };

        let instructions = {
            let mut items = prop_list(container, "recipeInstructions");
            if items.is_empty() {
                items = prop_list(container, "instructions");
            }
            items
        };

        // A Recipe container with no content is a false positive
        if ingredients.is_empty() && instructions.is_empty() {
            return None;
        }

        debug!("Found microdata recipe container on {}", host);
        Some(Self {
            host: host.to_string(),
            title: prop_value(container, "name"),
            image: image_value(container),
            total_time: prop_value(container, "totalTime"),
            prep_time: prop_value(container, "prepTime"),
            cook_time: prop_value(container, "cookTime"),
            ingredients,
            instructions,
            yields: prop_value(container, "recipeYield"),
            nutrients: nutrient_values(container),
        })
    }

    fn time_prop(&self, name: &str, raw: &Option<String>) -> Result<Option<u32>, ScrapeError> {
        match raw {
            Some(text) => duration::parse_minutes(text)
                .map(Some)
                .ok_or_else(|| ScrapeError::Malformed(format!("unreadable {}: {}", name, text))),
            None => Ok(None),
        }
    }
}

impl RecipeScraper for MicrodataScraper {
    fn host(&self) -> Result<String, ScrapeError> {
        Ok(self.host.clone())
    }

    fn title(&self) -> Result<String, ScrapeError> {
        self.title
            .clone()
            .ok_or_else(|| ScrapeError::Malformed("recipe container has no name".to_string()))
    }

    fn total_time(&self) -> Result<Option<u32>, ScrapeError> {
        if let Some(total) = self.time_prop("totalTime", &self.total_time)? {
            return Ok(Some(total));
        }

        let prep = self.time_prop("prepTime", &self.prep_time)?;
        let cook = self.time_prop("cookTime", &self.cook_time)?;
        if prep.is_none() && cook.is_none() {
            return Ok(None);
        }
        Ok(Some(prep.unwrap_or(0) + cook.unwrap_or(0)))
    }

    fn image(&self) -> Result<Option<String>, ScrapeError> {
        Ok(self.image.clone())
    }

    fn ingredients(&self) -> Result<Vec<String>, ScrapeError> {
        Ok(self.ingredients.clone())
    }

    fn instructions_list(&self) -> Result<Vec<String>, ScrapeError> {
        Ok(self.instructions.clone())
    }

    fn yields(&self) -> Result<Option<String>, ScrapeError> {
        Ok(self.yields.clone())
    }

    fn nutrients(&self) -> Result<Map<String, Value>, ScrapeError> {
        Ok(self.nutrients.clone())
    }
}

fn find_recipe_container(document: &Html) -> Option<ElementRef<'_>> {
    let selector = Selector::parse("[itemscope]").unwrap();
    document.select(&selector).find(|element| {
        element
            .value()
            .attr("itemtype")
            .map(|itemtype| {
                itemtype.contains("schema.org/Recipe")
                    || itemtype.contains("data-vocabulary.org/Recipe")
            })
            .unwrap_or(false)
    })
}

/// Read a single itemprop, preferring `content` and `datetime` attributes
/// over element text (`<meta>` and `<time>` carry their values there).
fn prop_value(root: ElementRef, prop: &str) -> Option<String> {
    let selector = Selector::parse(&format!("[itemprop='{}']", prop)).unwrap();
    let element = root.select(&selector).next()?;
    element_value(element)
}

fn prop_list(root: ElementRef, prop: &str) -> Vec<String> {
    let selector = Selector::parse(&format!("[itemprop='{}']", prop)).unwrap();
    root.select(&selector)
        .filter_map(element_value)
        .collect()
}

fn element_value(element: ElementRef) -> Option<String> {
    for attr in ["content", "datetime"] {
        if let Some(value) = element.value().attr(attr) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    let text = element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

fn image_value(root: ElementRef) -> Option<String> {
    let selector = Selector::parse("[itemprop='image']").unwrap();
    let element = root.select(&selector).next()?;

    if let Some(src) = element.value().attr("src") {
        return Some(src.to_string());
    }
    element_value(element)
}

/// Collect the nested itemprops of the `nutrition` scope as a flat mapping.
fn nutrient_values(root: ElementRef) -> Map<String, Value> {
    let scope_selector = Selector::parse("[itemprop='nutrition']").unwrap();
    let prop_selector = Selector::parse("[itemprop]").unwrap();

    let mut nutrients = Map::new();
    if let Some(scope) = root.select(&scope_selector).next() {
        for element in scope.select(&prop_selector) {
            let Some(name) = element.value().attr("itemprop") else {
                continue;
            };
            if let Some(value) = element_value(element) {
                nutrients
                    .entry(name.to_string())
                    .or_insert(Value::String(value));
            }
        }
    }
    nutrients
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECIPE_HTML: &str = r#"
        <html>
        <body>
        <div class="easyrecipe" itemscope itemtype="http://schema.org/Recipe">
            <div itemprop="name">Mom's Famous Banana Bread</div>
            <img itemprop="image" src="https://example.com/banana-bread.jpg" />
            <time itemprop="prepTime" datetime="PT10M">10 mins</time>
            <time itemprop="cookTime" datetime="PT1H">1 hour</time>
            <time itemprop="totalTime" datetime="PT1H10M">1 hour 10 mins</time>
            <span itemprop="recipeYield">12 servings</span>
            <ul>
                <li itemprop="ingredients">5 Tablespoons Butter</li>
                <li itemprop="ingredients">1 Cup White Sugar</li>
                <li itemprop="ingredients">1 Large Egg</li>
            </ul>
            <ol>
                <li itemprop="recipeInstructions">Preheat oven to 350 degrees.</li>
                <li itemprop="recipeInstructions">Beat butter and sugar until fluffy.</li>
            </ol>
            <div itemprop="nutrition" itemscope itemtype="http://schema.org/NutritionInformation">
                <span itemprop="calories">240 kcal</span>
                <span itemprop="fatContent">9 g</span>
            </div>
        </div>
        </body>
        </html>
    "#;

    fn scraper() -> MicrodataScraper {
        let document = Html::parse_document(RECIPE_HTML);
        MicrodataScraper::from_document("cookingdivine.com", &document).unwrap()
    }

    #[test]
    fn test_extracts_basic_fields() {
        let scraper = scraper();

        assert_eq!(scraper.host().unwrap(), "cookingdivine.com");
        assert_eq!(scraper.title().unwrap(), "Mom's Famous Banana Bread");
        assert_eq!(
            scraper.image().unwrap(),
            Some("https://example.com/banana-bread.jpg".to_string())
        );
        assert_eq!(scraper.yields().unwrap(), Some("12 servings".to_string()));
        assert_eq!(
            scraper.ingredients().unwrap(),
            vec![
                "5 Tablespoons Butter",
                "1 Cup White Sugar",
                "1 Large Egg"
            ]
        );
        assert_eq!(
            scraper.instructions().unwrap(),
            "Preheat oven to 350 degrees.\nBeat butter and sugar until fluffy."
        );
    }

    #[test]
    fn test_total_time_from_datetime_attribute() {
        assert_eq!(scraper().total_time().unwrap(), Some(70));
    }

    #[test]
    fn test_total_time_falls_back_to_prep_plus_cook() {
        let html = RECIPE_HTML.replace(
            r#"<time itemprop="totalTime" datetime="PT1H10M">1 hour 10 mins</time>"#,
            "",
        );
        let document = Html::parse_document(&html);
        let scraper = MicrodataScraper::from_document("cookingdivine.com", &document).unwrap();
        assert_eq!(scraper.total_time().unwrap(), Some(70));
    }

    #[test]
    fn test_unreadable_time_is_error() {
        let html = RECIPE_HTML.replace(
            r#"<time itemprop="totalTime" datetime="PT1H10M">1 hour 10 mins</time>"#,
            r#"<span itemprop="totalTime">about an hour</span>"#,
        );
        let document = Html::parse_document(&html);
        let scraper = MicrodataScraper::from_document("cookingdivine.com", &document).unwrap();
        assert!(matches!(
            scraper.total_time(),
            Err(ScrapeError::Malformed(_))
        ));
    }

    #[test]
    fn test_nutrients_from_nested_scope() {
        let nutrients = scraper().nutrients().unwrap();
        assert_eq!(nutrients["calories"], "240 kcal");
        assert_eq!(nutrients["fatContent"], "9 g");
    }

    #[test]
    fn test_empty_container_is_not_recognized() {
        let html = r#"
            <html><body>
            <div itemscope itemtype="http://schema.org/Recipe">
                <div itemprop="name">All name, no recipe</div>
            </div>
            </body></html>
        "#;
        let document = Html::parse_document(html);
        assert!(MicrodataScraper::from_document("example.com", &document).is_none());
    }

    #[test]
    fn test_no_container_is_not_recognized() {
        let html = "<html><body><p>Just text</p></body></html>";
        let document = Html::parse_document(html);
        assert!(MicrodataScraper::from_document("example.com", &document).is_none());
    }
}
