pub mod normalize;
pub mod rank;
pub mod types;

pub use normalize::normalize;
pub use rank::{pick_random, rank};
pub use types::{IngredientSet, Match, MatchResult};
