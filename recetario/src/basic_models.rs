use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Meal categories a recipe can belong to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Category {
    Desayuno,
    Brunch,
    Almuerzo,
    Merienda,
    Cena,
    Postre,
}

impl Category {
    /// Human readable label, e.g. `Desayuno` for `DESAYUNO`.
    pub fn label(&self) -> String {
        let code: &'static str = self.into();
        let mut chars = code.chars();
        match chars.next() {
            Some(first) => first.to_string() + &chars.as_str().to_lowercase(),
            None => String::new(),
        }
    }
}

/// Backend assigned identifier. Usually numeric, but treated as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecipeId::Number(n) => write!(f, "{n}"),
            RecipeId::Text(s) => f.write_str(s),
        }
    }
}

impl std::str::FromStr for RecipeId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(s.parse::<i64>()
            .map(RecipeId::Number)
            .unwrap_or_else(|_| RecipeId::Text(s.to_string())))
    }
}

impl From<i64> for RecipeId {
    fn from(value: i64) -> Self {
        RecipeId::Number(value)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    // Older backends sent a single `category`
    #[serde(default, alias = "category", deserialize_with = "one_or_many")]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub fit: bool,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Recipe {
    /// Comma separated category labels, for cards and the detail header.
    pub fn category_labels(&self) -> String {
        self.categories
            .iter()
            .map(Category::label)
            .join(", ")
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Category),
        Many(Vec<Category>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(category)) => vec![category],
        Some(OneOrMany::Many(categories)) => categories,
        None => vec![],
    })
}

/// One page of the list/search endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecipePage {
    #[serde(default)]
    pub content: Vec<Recipe>,
    #[serde(default)]
    pub total_pages: u32,
}

/// The JSON object sent as the `recipe` part of create and update requests.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecipePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecipeId>,
    pub title: String,
    pub categories: Vec<Category>,
    pub fit: bool,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_current_recipe_shape() {
        let recipe: Recipe = serde_json::from_value(json!({
            "id": 7,
            "title": "Panqueques",
            "categories": ["DESAYUNO", "MERIENDA"],
            "fit": false,
            "ingredients": ["harina", "leche"],
            "instructions": "1) Mezclar 2) Cocinar",
            "imageUrl": "https://cdn.example/p.webp"
        }))
        .unwrap();
        assert_eq!(recipe.id, RecipeId::Number(7));
        assert_eq!(
            recipe.categories,
            vec![Category::Desayuno, Category::Merienda]
        );
        assert_eq!(recipe.image_url.as_deref(), Some("https://cdn.example/p.webp"));
    }

    #[test]
    fn folds_legacy_single_category() {
        let recipe: Recipe = serde_json::from_value(json!({
            "id": "abc",
            "title": "Ensalada",
            "category": "ALMUERZO",
            "fit": true,
            "ingredients": [],
            "instructions": ""
        }))
        .unwrap();
        assert_eq!(recipe.id, RecipeId::Text("abc".into()));
        assert_eq!(recipe.categories, vec![Category::Almuerzo]);
        assert_eq!(recipe.image_url, None);

        let out = serde_json::to_value(&recipe).unwrap();
        assert_eq!(out["categories"], json!(["ALMUERZO"]));
        assert!(out.get("category").is_none());
    }

    #[test]
    fn null_category_is_empty() {
        let recipe: Recipe =
            serde_json::from_value(json!({"id": 1, "title": "x", "category": null})).unwrap();
        assert!(recipe.categories.is_empty());
    }

    #[test]
    fn page_defaults_when_fields_missing() {
        let page: RecipePage = serde_json::from_str("{}").unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn category_codes_and_labels() {
        assert_eq!("postre".parse::<Category>().unwrap(), Category::Postre);
        assert_eq!(Category::Merienda.to_string(), "MERIENDA");
        assert_eq!(Category::Desayuno.label(), "Desayuno");
    }

    #[test]
    fn payload_omits_id_for_create() {
        let payload = RecipePayload {
            id: None,
            title: "Tarta".into(),
            categories: vec![Category::Cena],
            fit: true,
            ingredients: vec!["huevo".into()],
            instructions: "Hornear".into(),
        };
        let out = serde_json::to_value(&payload).unwrap();
        assert!(out.get("id").is_none());
        assert_eq!(out["categories"], json!(["CENA"]));
    }

    #[test]
    fn recipe_id_parses_numbers_first() {
        assert_eq!("42".parse::<RecipeId>().unwrap(), RecipeId::Number(42));
        assert_eq!(
            "r-42".parse::<RecipeId>().unwrap(),
            RecipeId::Text("r-42".into())
        );
    }
}
