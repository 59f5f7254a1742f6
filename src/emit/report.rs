use serde::{Deserialize, Serialize};

use crate::matcher::{IngredientSet, MatchResult};

/// A ranked suggestion list, ready for output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionReport {
    pub ingredients: Vec<String>,
    pub matches_total: usize,
    pub matches: Vec<SuggestionEntry>,
}

/// One ranked recipe in a report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionEntry {
    pub rank: usize,
    pub name: String,
    pub overlap: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shared: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

impl SuggestionReport {
    /// Build a report from a ranking, keeping at most `limit` entries.
    pub fn new(ingredients: &IngredientSet, matches: &MatchResult, limit: Option<usize>) -> Self {
        let shown = limit.unwrap_or(matches.len());
        let entries = matches
            .iter()
            .take(shown)
            .enumerate()
            .map(|(i, m)| {
                let (shared, missing): (Vec<String>, Vec<String>) = m
                    .recipe
                    .tokens()
                    .iter()
                    .map(str::to_owned)
                    .partition(|t| ingredients.contains(t));
                SuggestionEntry {
                    rank: i + 1,
                    name: m.recipe.name().to_owned(),
                    overlap: m.overlap,
                    shared,
                    missing,
                }
            })
            .collect();

        Self {
            ingredients: ingredients.iter().map(str::to_owned).collect(),
            matches_total: matches.len(),
            matches: entries,
        }
    }
}
