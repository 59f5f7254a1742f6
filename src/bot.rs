use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use rand::rngs::StdRng;

use crate::catalog::Catalog;
use crate::session::{Action, Engine, Reply, Session, SessionId, SessionStore, StoreLimits};

/// The conversation core as seen by a transport.
///
/// Combines the state machine with the session store so callers deal only
/// in session ids. Methods take `&mut self`: a host that shares a `Bot`
/// across threads wraps it in a `Mutex`.
pub struct Bot<R = StdRng> {
    engine: Engine<R>,
    store: SessionStore,
}

impl Bot<StdRng> {
    pub fn new(catalog: Arc<Catalog>, limits: StoreLimits) -> Self {
        Self::with_engine(Engine::new(catalog), SessionStore::new(limits))
    }
}

impl<R: Rng> Bot<R> {
    pub fn with_engine(engine: Engine<R>, store: SessionStore) -> Self {
        Self { engine, store }
    }

    pub fn catalog(&self) -> &Catalog {
        self.engine.catalog()
    }

    /// The `/start` entry command.
    pub fn on_start(&mut self, id: SessionId, membership_ok: bool) -> Reply {
        let session = self.store.session_mut(id, Instant::now());
        self.engine.start(session, membership_ok)
    }

    /// Free-text ingredient input.
    pub fn on_ingredients_text(&mut self, id: SessionId, raw: &str, membership_ok: bool) -> Reply {
        let session = self.store.session_mut(id, Instant::now());
        self.engine.submit_ingredients(session, raw, membership_ok)
    }

    /// A decoded button action.
    pub fn on_action(&mut self, id: SessionId, action: Action) -> Reply {
        let session = self.store.session_mut(id, Instant::now());
        self.engine.apply(session, action)
    }

    /// A raw callback payload, decoded at this boundary.
    pub fn on_callback(&mut self, id: SessionId, payload: &str) -> Reply {
        let action = Action::decode(payload, self.engine.catalog());
        self.on_action(id, action)
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.store.get(id)
    }

    pub fn session_count(&self) -> usize {
        self.store.len()
    }

    /// Drop sessions idle past the store's TTL.
    pub fn evict_idle(&mut self) -> usize {
        self.store.evict_idle(Instant::now())
    }
}
