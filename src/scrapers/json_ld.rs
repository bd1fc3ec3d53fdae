use html_escape::decode_html_entities;
use log::debug;
use scraper::{Html, Selector};
use serde_json::{Map, Value};

use super::{duration, RecipeScraper};
use crate::error::ScrapeError;

/// Scraper backed by a schema.org Recipe node found in JSON-LD markup.
pub struct JsonLdScraper {
    host: String,
    recipe: Value,
}

impl JsonLdScraper {
    /// Look for a Recipe node in the document's `ld+json` script blocks.
    pub fn from_document(host: &str, document: &Html) -> Option<Self> {
        let selector = Selector::parse("script[type='application/ld+json']").unwrap();

        for script in document.select(&selector) {
            let cleaned = sanitize_json(&script.inner_html());
            if let Ok(json) = serde_json::from_str::<Value>(&cleaned) {
                if let Some(node) = find_recipe_node(&json) {
                    debug!("Found JSON-LD recipe node on {}", host);
                    return Some(Self {
                        host: host.to_string(),
                        recipe: node.clone(),
                    });
                }
            }
        }

        None
    }

    /// Field lookup that treats explicit `null` the same as an absent key.
    fn field(&self, key: &str) -> Option<&Value> {
        self.recipe.get(key).filter(|value| !value.is_null())
    }

    fn time_field(&self, key: &str) -> Result<Option<u32>, ScrapeError> {
        match self.field(key) {
            Some(value) => parse_time(key, value).map(Some),
            None => Ok(None),
        }
    }
}

impl RecipeScraper for JsonLdScraper {
    fn host(&self) -> Result<String, ScrapeError> {
        Ok(self.host.clone())
    }

    fn title(&self) -> Result<String, ScrapeError> {
        self.field("name")
            .or_else(|| self.field("headline"))
            .and_then(Value::as_str)
            .map(clean_text)
            .ok_or_else(|| ScrapeError::Malformed("recipe node has no name".to_string()))
    }

    fn total_time(&self) -> Result<Option<u32>, ScrapeError> {
        if let Some(total) = self.time_field("totalTime")? {
            return Ok(Some(total));
        }

        let prep = self.time_field("prepTime")?;
        let cook = self.time_field("cookTime")?;
        if prep.is_none() && cook.is_none() {
            return Ok(None);
        }
        Ok(Some(prep.unwrap_or(0) + cook.unwrap_or(0)))
    }

    fn image(&self) -> Result<Option<String>, ScrapeError> {
        Ok(self.field("image").and_then(image_url))
    }

    fn ingredients(&self) -> Result<Vec<String>, ScrapeError> {
        let raw = self
            .field("recipeIngredient")
            .or_else(|| self.field("ingredients"));

        match raw {
            Some(Value::Array(items)) => Ok(items
                .iter()
                .filter_map(Value::as_str)
                .map(clean_text)
                .filter(|text| !text.is_empty())
                .collect()),
            Some(other) => Err(ScrapeError::Malformed(format!(
                "recipeIngredient is not a list: {}",
                other
            ))),
            None => Ok(Vec::new()),
        }
    }

    fn instructions_list(&self) -> Result<Vec<String>, ScrapeError> {
        let mut steps = Vec::new();
        if let Some(value) = self.field("recipeInstructions") {
            collect_steps(value, &mut steps);
        }
        Ok(steps)
    }

    fn yields(&self) -> Result<Option<String>, ScrapeError> {
        Ok(self.field("recipeYield").and_then(yield_text))
    }

    fn nutrients(&self) -> Result<Map<String, Value>, ScrapeError> {
        match self.field("nutrition") {
            Some(Value::Object(nutrition)) => Ok(nutrition
                .iter()
                .filter(|(key, _)| !key.starts_with('@'))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()),
            Some(other) => Err(ScrapeError::Malformed(format!(
                "nutrition is not an object: {}",
                other
            ))),
            None => Ok(Map::new()),
        }
    }
}

/// Locate a Recipe node in a parsed JSON-LD value.
///
/// Handles the three shapes seen in the wild: a top-level Recipe object, an
/// array of objects, and a `@graph` container.
fn find_recipe_node(json: &Value) -> Option<&Value> {
    match json {
        Value::Array(items) => items.iter().find_map(find_recipe_node),
        Value::Object(obj) => {
            if is_recipe_node(json) {
                return Some(json);
            }
            obj.get("@graph").and_then(find_recipe_node)
        }
        _ => None,
    }
}

fn is_recipe_node(value: &Value) -> bool {
    if has_recipe_type(value.get("@type")) {
        return true;
    }
    value.get("recipeInstructions").is_some()
}

// @type can be a string or an array, and sites disagree on capitalization
fn has_recipe_type(type_value: Option<&Value>) -> bool {
    match type_value {
        Some(Value::String(name)) => name.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .any(|name| name.eq_ignore_ascii_case("recipe")),
        _ => false,
    }
}

fn parse_time(key: &str, value: &Value) -> Result<u32, ScrapeError> {
    match value {
        Value::Number(minutes) => minutes
            .as_u64()
            .map(|minutes| minutes as u32)
            .ok_or_else(|| ScrapeError::Malformed(format!("unreadable {}: {}", key, minutes))),
        Value::String(text) => duration::parse_minutes(text)
            .ok_or_else(|| ScrapeError::Malformed(format!("unreadable {}: {}", key, text))),
        other => Err(ScrapeError::Malformed(format!(
            "unreadable {}: {}",
            key, other
        ))),
    }
}

fn image_url(value: &Value) -> Option<String> {
    match value {
        Value::String(url) => {
            let url = url.trim();
            (!url.is_empty()).then(|| url.to_string())
        }
        Value::Object(obj) => obj.get("url").and_then(image_url),
        Value::Array(items) => items.iter().find_map(image_url),
        _ => None,
    }
}

fn yield_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let text = clean_text(text);
            (!text.is_empty()).then_some(text)
        }
        Value::Number(count) => {
            if count.as_u64() == Some(1) {
                Some("1 serving".to_string())
            } else {
                Some(format!("{} servings", count))
            }
        }
        Value::Array(items) => items.iter().find_map(yield_text),
        _ => None,
    }
}

/// Flatten `recipeInstructions` into an ordered step list.
///
/// The value can be a newline-delimited string, a list of strings, a list of
/// HowToStep objects, or HowToSections wrapping further steps.
fn collect_steps(value: &Value, steps: &mut Vec<String>) {
    match value {
        Value::String(text) => {
            for line in text.split('\n') {
                let step = clean_text(line);
                if !step.is_empty() {
                    steps.push(step);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_steps(item, steps);
            }
        }
        Value::Object(obj) => {
            if let Some(elements) = obj.get("itemListElement") {
                collect_steps(elements, steps);
            } else if let Some(text) = obj
                .get("text")
                .or_else(|| obj.get("description"))
                .and_then(Value::as_str)
            {
                let step = clean_text(text);
                if !step.is_empty() {
                    steps.push(step);
                }
            }
        }
        _ => {}
    }
}

fn clean_text(text: &str) -> String {
    // entities show up double-encoded in the wild
    let decoded = decode_html_entities(&decode_html_entities(text)).into_owned();
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean up script contents that are almost-but-not-quite valid JSON.
fn sanitize_json(json_str: &str) -> String {
    let mut cleaned = json_str.trim().to_string();

    if !cleaned.starts_with('{') && !cleaned.starts_with('[') {
        if let Some(start) = cleaned.find('{') {
            cleaned = cleaned[start..].to_string();
        }
    }

    // trailing commas and stray HTML comments
    cleaned = cleaned.replace(",]", "]").replace(",}", "}");
    cleaned = cleaned.replace("<!--", "").replace("-->", "");

    cleaned
}
