pub mod action;
pub mod machine;
pub mod reply;
pub mod state;
pub mod store;

pub use action::{Action, MAX_PAYLOAD_BYTES};
pub use machine::Engine;
pub use reply::{Notice, Prompt, Reply};
pub use state::{Session, SessionState};
pub use store::{SessionId, SessionStore, StoreLimits};
