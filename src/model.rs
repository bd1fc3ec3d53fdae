use serde::Serialize;
use serde_json::{Map, Value};

/// A labeled subset of a recipe's ingredient list.
///
/// `purpose` is `None` when the site does not group its ingredients; in that
/// case a single group carries the full ingredient list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientGroup {
    pub purpose: Option<String>,
    pub ingredients: Vec<String>,
}

/// The structured recipe data produced by one scrape.
///
/// Field names are the stable wire names: the record is serialized as-is to
/// a single JSON line. Optional fields serialize as `null` when the page does
/// not carry them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapedRecipe {
    pub host: String,
    pub title: String,
    /// Total time in minutes.
    pub total_time: Option<u32>,
    pub image: Option<String>,
    pub ingredients: Vec<String>,
    pub ingredient_groups: Vec<IngredientGroup>,
    /// All steps joined with newlines.
    pub instructions: String,
    pub instructions_list: Vec<String>,
    pub yields: Option<String>,
    /// Passed through from the page unvalidated.
    pub nutrients: Map<String, Value>,
}
