use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::catalog::{Catalog, Recipe};
use crate::matcher::{normalize, pick_random, rank};
use crate::session::action::Action;
use crate::session::reply::{Notice, Prompt, Reply};
use crate::session::state::{Session, SessionState};

/// The session state machine.
///
/// Holds the shared catalog and the random source used for tie-breaking and
/// random picks. Every transition runs to completion without I/O; the caller
/// owns the `Session` and guarantees one event at a time per session.
pub struct Engine<R = StdRng> {
    catalog: Arc<Catalog>,
    rng: R,
}

impl Engine<StdRng> {
    /// Create an engine seeded from system entropy.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_rng(catalog, StdRng::from_entropy())
    }
}

impl<R: Rng> Engine<R> {
    /// Create an engine with an explicit random source (seeded in tests).
    pub fn with_rng(catalog: Arc<Catalog>, rng: R) -> Self {
        Self { catalog, rng }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Entry command. Resets the session when the user is allowed in.
    pub fn start(&mut self, session: &mut Session, membership_ok: bool) -> Reply {
        if !membership_ok {
            debug!("start refused, membership required");
            return Reply::JoinRequired;
        }
        session.reset();
        Reply::Greeting(Prompt::Welcome)
    }

    /// Free-text ingredient submission.
    ///
    /// Replaces the session's ingredients, except right after `AddMore`,
    /// where the new tokens are merged into the existing set.
    pub fn submit_ingredients(
        &mut self,
        session: &mut Session,
        raw: &str,
        membership_ok: bool,
    ) -> Reply {
        if !membership_ok {
            debug!("ingredients refused, membership required");
            return Reply::JoinRequired;
        }

        let tokens = normalize(raw);
        if *session.state() == SessionState::AwaitingIngredients {
            session.merge_ingredients(&tokens);
        } else {
            session.replace_ingredients(tokens);
        }
        debug!(ingredients = %session.ingredients().to_text(), "ingredients recorded");

        self.suggest(session)
    }

    /// Apply a button action.
    pub fn apply(&mut self, session: &mut Session, action: Action) -> Reply {
        debug!(?action, state = ?session.state(), "applying action");
        match action {
            Action::Select(name) => self.select(session, &name),
            Action::Another => self.suggest(session),
            // Random and AddMore are only offered from the no-matches view.
            Action::Random => {
                if *session.state() != SessionState::NoMatches {
                    return Reply::Error(Notice::StaleAction);
                }
                match pick_random(&self.catalog, &mut self.rng) {
                    Some(recipe) => Self::show(session, recipe),
                    None => Reply::Error(Notice::EmptyCatalog),
                }
            }
            Action::AddMore => {
                if *session.state() != SessionState::NoMatches {
                    return Reply::Error(Notice::StaleAction);
                }
                session.set_state(SessionState::AwaitingIngredients);
                Reply::Greeting(Prompt::MoreIngredients)
            }
            Action::Restart => {
                session.reset();
                Reply::Greeting(Prompt::Restarted)
            }
        }
    }

    fn suggest(&mut self, session: &mut Session) -> Reply {
        let matches = rank(session.ingredients(), &self.catalog, &mut self.rng);
        if matches.is_empty() {
            session.set_state(SessionState::NoMatches);
            Reply::NoMatches
        } else {
            session.set_state(SessionState::ShowingSuggestions);
            Reply::Suggestions(matches)
        }
    }

    fn select(&self, session: &mut Session, name: &str) -> Reply {
        match self.catalog.get(name) {
            Some(recipe) => Self::show(session, Arc::clone(recipe)),
            None => {
                warn!(recipe = %name, "selected recipe is not in the catalog");
                Reply::Error(Notice::UnknownRecipe(name.to_owned()))
            }
        }
    }

    fn show(session: &mut Session, recipe: Arc<Recipe>) -> Reply {
        session.set_state(SessionState::ShowingDetail {
            recipe: recipe.name().to_owned(),
        });
        Reply::Detail(recipe)
    }
}
