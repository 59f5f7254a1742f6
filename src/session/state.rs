use crate::matcher::IngredientSet;

/// Where a conversation currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing recorded yet, or just reset.
    #[default]
    Idle,
    /// The user asked to add more ingredients; the next submission is merged.
    AwaitingIngredients,
    /// A non-empty match list is on screen.
    ShowingSuggestions,
    /// The last ranking found nothing.
    NoMatches,
    /// One recipe's detail is on screen.
    ShowingDetail { recipe: String },
}

/// Per-user conversation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    ingredients: IngredientSet,
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingredients(&self) -> &IngredientSet {
        &self.ingredients
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub(super) fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    pub(super) fn replace_ingredients(&mut self, ingredients: IngredientSet) {
        self.ingredients = ingredients;
    }

    pub(super) fn merge_ingredients(&mut self, ingredients: &IngredientSet) {
        self.ingredients.union_with(ingredients);
    }

    /// Forget all ingredients and return to `Idle`.
    pub(super) fn reset(&mut self) {
        self.ingredients.clear();
        self.state = SessionState::Idle;
    }
}
