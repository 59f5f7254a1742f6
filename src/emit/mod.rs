pub mod report;
pub mod structured;
pub mod text;

pub use self::report::{SuggestionEntry, SuggestionReport};
