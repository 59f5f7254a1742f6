use std::borrow::Cow;

use crate::catalog::{Catalog, recipe_key};

/// A button press, decoded from its callback payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// Show the detail of the named recipe.
    Select(String),
    /// Re-rank the current ingredients.
    Another,
    /// Clear everything and start over.
    Restart,
    /// Show a random recipe from the whole catalog.
    Random,
    /// Ask for more ingredients to merge into the current set.
    AddMore,
}

const ANOTHER: &str = "another_suggestion";
const RESTART: &str = "restart";
const RANDOM: &str = "random";
const ADD_MORE: &str = "add_more";

/// Prefix of a recipe-selection payload; the rest is the recipe key.
const SELECT_PREFIX: &str = "r:";

/// Telegram rejects callback data longer than this many bytes.
pub const MAX_PAYLOAD_BYTES: usize = 64;

impl Action {
    /// Decode a callback payload.
    ///
    /// `r:<key>` payloads are resolved to a recipe name through `catalog`.
    /// A key the catalog does not know, and any other payload that is not a
    /// fixed command token, is taken verbatim as a recipe name.
    pub fn decode(payload: &str, catalog: &Catalog) -> Self {
        match payload {
            ANOTHER => Self::Another,
            RESTART => Self::Restart,
            RANDOM => Self::Random,
            ADD_MORE => Self::AddMore,
            other => {
                let resolved = other
                    .strip_prefix(SELECT_PREFIX)
                    .and_then(|key| catalog.get_by_key(key));
                match resolved {
                    Some(recipe) => Self::Select(recipe.name().to_owned()),
                    None => Self::Select(other.to_owned()),
                }
            }
        }
    }

    /// The callback payload for this action. Never longer than
    /// [`MAX_PAYLOAD_BYTES`], whatever the recipe name.
    pub fn encode(&self) -> Cow<'static, str> {
        match self {
            Self::Select(name) => Cow::Owned(format!("{SELECT_PREFIX}{}", recipe_key(name))),
            Self::Another => Cow::Borrowed(ANOTHER),
            Self::Restart => Cow::Borrowed(RESTART),
            Self::Random => Cow::Borrowed(RANDOM),
            Self::AddMore => Cow::Borrowed(ADD_MORE),
        }
    }
}
