use std::sync::Arc;

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::catalog::{Catalog, Recipe};
use crate::matcher::types::{IngredientSet, Match, MatchResult};

/// Rank every catalog recipe that shares at least one ingredient with `ingredients`.
///
/// Ordering is by overlap count, descending. Ties are broken by a key drawn
/// from `rng` for each candidate, so recipes with equal overlap come back in
/// a different order on every call unless the generator is seeded. The full
/// ranked list is returned; cutting it to a display window is up to the caller.
pub fn rank<R: Rng + ?Sized>(
    ingredients: &IngredientSet,
    catalog: &Catalog,
    rng: &mut R,
) -> MatchResult {
    if ingredients.is_empty() {
        return Vec::new();
    }

    let mut keyed: Vec<(u64, Match)> = Vec::new();
    for recipe in catalog.recipes() {
        let overlap = ingredients.overlap(recipe.tokens());
        if overlap == 0 {
            continue;
        }
        let match_ = Match {
            recipe: Arc::clone(recipe),
            overlap,
        };
        keyed.push((rng.next_u64(), match_));
    }

    keyed.sort_by(|(key_a, a), (key_b, b)| {
        b.overlap.cmp(&a.overlap).then_with(|| key_a.cmp(key_b))
    });

    keyed.into_iter().map(|(_, m)| m).collect()
}

/// Pick one recipe uniformly at random, ignoring ingredient overlap.
///
/// Returns `None` for an empty catalog.
pub fn pick_random<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> Option<Arc<Recipe>> {
    catalog.recipes().choose(rng).cloned()
}
