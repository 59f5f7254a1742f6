use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::catalog::Recipe;
use crate::matcher::normalize::canonical_token;

/// A deduplicated set of canonical ingredient tokens.
///
/// Tokens are trimmed, whitespace-collapsed and lower-cased on insertion, and
/// empty tokens are never stored. Iteration order is lexicographic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IngredientSet(BTreeSet<String>);

impl IngredientSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Canonicalize and insert a token. Returns `false` if the token was
    /// empty or already present.
    pub fn insert(&mut self, raw: &str) -> bool {
        match canonical_token(raw) {
            Some(token) => self.0.insert(token),
            None => false,
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        canonical_token(token).is_some_and(|t| self.0.contains(&t))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Add every token of `other` to this set.
    pub fn union_with(&mut self, other: &IngredientSet) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Number of tokens present in both sets.
    pub fn overlap(&self, other: &IngredientSet) -> usize {
        self.0.intersection(&other.0).count()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Comma-joined text form, suitable for feeding back into `normalize`.
    pub fn to_text(&self) -> String {
        self.iter().collect::<Vec<_>>().join(", ")
    }
}

impl<S: AsRef<str>> FromIterator<S> for IngredientSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for token in iter {
            set.insert(token.as_ref());
        }
        set
    }
}

/// A recipe that shares at least one ingredient with the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub recipe: Arc<Recipe>,
    /// Size of the intersection between session and recipe ingredients.
    pub overlap: usize,
}

/// Ranked matches, highest overlap first.
pub type MatchResult = Vec<Match>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_canonicalizes_tokens() {
        let mut set = IngredientSet::new();
        assert!(set.insert("  Green   Pepper "));
        assert!(set.contains("green pepper"));
        assert!(set.contains("GREEN PEPPER"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn insert_rejects_blank_and_duplicate_tokens() {
        let mut set = IngredientSet::new();
        assert!(!set.insert("   "));
        assert!(set.insert("egg"));
        assert!(!set.insert("EGG"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn union_keeps_both_sides() {
        let mut a: IngredientSet = ["egg", "salt"].into_iter().collect();
        let b: IngredientSet = ["salt", "tomato"].into_iter().collect();
        a.union_with(&b);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec!["egg", "salt", "tomato"]);
    }

    #[test]
    fn overlap_counts_shared_tokens() {
        let a: IngredientSet = ["egg", "salt", "milk"].into_iter().collect();
        let b: IngredientSet = ["Salt", "egg", "flour"].into_iter().collect();
        assert_eq!(a.overlap(&b), 2);
        assert_eq!(b.overlap(&a), 2);
        assert_eq!(a.overlap(&IngredientSet::new()), 0);
    }

    #[test]
    fn to_text_joins_sorted_tokens() {
        let set: IngredientSet = ["tomato", "egg"].into_iter().collect();
        assert_eq!(set.to_text(), "egg, tomato");
        assert_eq!(IngredientSet::new().to_text(), "");
    }
}
