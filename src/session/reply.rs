use std::sync::Arc;

use crate::catalog::Recipe;
use crate::matcher::MatchResult;

/// What the engine wants shown to the user after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The user must join the gating channel first.
    JoinRequired,
    /// A prompt asking for ingredients.
    Greeting(Prompt),
    /// Ranked matches, full list; the renderer picks the window.
    Suggestions(MatchResult),
    /// Ranking found nothing.
    NoMatches,
    /// One recipe in full.
    Detail(Arc<Recipe>),
    /// A recoverable failure notice.
    Error(Notice),
}

/// The flavour of ingredient prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Welcome,
    Restarted,
    MoreIngredients,
}

/// Recoverable failures surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A selected recipe name is not in the catalog.
    UnknownRecipe(String),
    /// A random pick was requested from an empty catalog.
    EmptyCatalog,
    /// A button was pressed outside the view that offers it.
    StaleAction,
}

impl Reply {
    /// Whether a transport should replace the message carrying the pressed
    /// button instead of sending a new one.
    pub fn edits_message(&self) -> bool {
        matches!(
            self,
            Self::Detail(_) | Self::Error(_) | Self::Greeting(Prompt::MoreIngredients)
        )
    }
}
