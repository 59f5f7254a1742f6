pub mod source;

use std::collections::BTreeMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::matcher::IngredientSet;

pub use source::{CatalogError, CatalogSource, FileCatalog, load_or_empty};

/// A single recipe. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    name: String,
    ingredients: Vec<String>,
    instructions: String,
    tokens: IngredientSet,
    key: String,
}

/// A short, stable key for a recipe name: the first 8 bytes of its SHA-256,
/// hex-encoded. Used where the full name is too long to carry, such as
/// button payloads.
pub fn recipe_key(name: &str) -> String {
    let digest = Sha256::digest(name.as_bytes());
    hex::encode(&digest[..8])
}

impl Recipe {
    /// Build a recipe. Ingredients are kept verbatim for display; their
    /// canonical tokens are cached for matching.
    pub fn new(
        name: impl Into<String>,
        ingredients: Vec<String>,
        instructions: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let tokens = ingredients.iter().collect();
        let key = recipe_key(&name);
        Self {
            name,
            ingredients,
            instructions: instructions.into(),
            tokens,
            key,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ingredients in catalog order, as written in the source.
    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Canonical ingredient tokens used for overlap counting.
    pub fn tokens(&self) -> &IngredientSet {
        &self.tokens
    }

    /// See [`recipe_key`].
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// The read-only recipe collection, keyed by recipe name.
///
/// Built once at startup and shared behind an `Arc`. An empty catalog is a
/// valid value: it is what a missing or unreadable source degrades to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    recipes: BTreeMap<String, Arc<Recipe>>,
    /// Recipe key to recipe name.
    keys: BTreeMap<String, String>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog, skipping recipes that break the catalog invariants
    /// (blank name, no usable ingredients, duplicate name or key).
    pub fn from_recipes(recipes: impl IntoIterator<Item = Recipe>) -> Self {
        let mut map = BTreeMap::new();
        let mut keys = BTreeMap::new();

        for recipe in recipes {
            if recipe.name.trim().is_empty() {
                warn!("skipping recipe with a blank name");
                continue;
            }
            if recipe.tokens.is_empty() {
                warn!(recipe = %recipe.name, "skipping recipe without ingredients");
                continue;
            }
            if map.contains_key(&recipe.name) {
                warn!(recipe = %recipe.name, "skipping duplicate recipe name");
                continue;
            }
            if let Some(taken) = keys.get(&recipe.key) {
                warn!(recipe = %recipe.name, other = %taken, "skipping recipe whose key collides");
                continue;
            }
            keys.insert(recipe.key.clone(), recipe.name.clone());
            map.insert(recipe.name.clone(), Arc::new(recipe));
        }

        Self { recipes: map, keys }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Recipe>> {
        self.recipes.get(name)
    }

    /// Look a recipe up by its [`recipe_key`].
    pub fn get_by_key(&self, key: &str) -> Option<&Arc<Recipe>> {
        self.keys.get(key).and_then(|name| self.recipes.get(name))
    }

    /// All recipes, ordered by name.
    pub fn recipes(&self) -> impl Iterator<Item = &Arc<Recipe>> {
        self.recipes.values()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Number of distinct canonical ingredient tokens across all recipes.
    pub fn distinct_ingredients(&self) -> usize {
        let mut all = IngredientSet::new();
        for recipe in self.recipes.values() {
            all.union_with(&recipe.tokens);
        }
        all.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(name: &str, ingredients: &[&str]) -> Recipe {
        Recipe::new(
            name,
            ingredients.iter().map(|s| (*s).to_owned()).collect(),
            "cook it",
        )
    }

    #[test]
    fn recipe_caches_canonical_tokens() {
        let r = recipe("Omelette", &["Egg", " Salt ", "egg"]);
        assert_eq!(r.ingredients(), &["Egg", " Salt ", "egg"]);
        assert_eq!(r.tokens().len(), 2);
        assert!(r.tokens().contains("egg"));
        assert!(r.tokens().contains("salt"));
    }

    #[test]
    fn catalog_lookup_by_name() {
        let catalog = Catalog::from_recipes(vec![recipe("Omelette", &["egg"])]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("Omelette").unwrap().instructions(), "cook it");
        assert!(catalog.get("omelette").is_none());
    }

    #[test]
    fn catalog_lookup_by_key() {
        let catalog = Catalog::from_recipes(vec![
            recipe("Omelette", &["egg"]),
            recipe("Salad", &["tomato"]),
        ]);
        let salad = catalog.get("Salad").unwrap();
        assert_eq!(salad.key(), recipe_key("Salad"));
        assert_eq!(salad.key().len(), 16);
        assert_eq!(catalog.get_by_key(salad.key()).unwrap().name(), "Salad");
        assert!(catalog.get_by_key("Salad").is_none());
    }

    #[test]
    fn recipe_key_is_stable_and_distinct() {
        assert_eq!(recipe_key("Omelette"), recipe_key("Omelette"));
        assert_ne!(recipe_key("Omelette"), recipe_key("omelette"));
        assert!(recipe_key("").chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn catalog_skips_invalid_recipes() {
        let catalog = Catalog::from_recipes(vec![
            recipe("Empty", &[]),
            recipe("Blank", &["  "]),
            recipe("  ", &["egg"]),
            recipe("Toast", &["bread"]),
            recipe("Toast", &["butter"]),
        ]);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("Toast").unwrap().tokens().contains("bread"));
    }

    #[test]
    fn catalog_iterates_in_name_order() {
        let catalog = Catalog::from_recipes(vec![
            recipe("Salad", &["tomato"]),
            recipe("Omelette", &["egg"]),
        ]);
        let names: Vec<&str> = catalog.recipes().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Omelette", "Salad"]);
    }

    #[test]
    fn catalog_counts_distinct_ingredients() {
        let catalog = Catalog::from_recipes(vec![
            recipe("Omelette", &["egg", "salt"]),
            recipe("Salad", &["tomato", "Salt"]),
        ]);
        assert_eq!(catalog.distinct_ingredients(), 3);
    }

    #[test]
    fn empty_catalog_is_empty() {
        let catalog = Catalog::empty();
        assert!(catalog.is_empty());
        assert_eq!(catalog.recipes().count(), 0);
    }
}
