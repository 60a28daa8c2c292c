//! Data model types.
//!
//! - Values (the codec's structured value model)
//! - JSON bridge (conversions to and from `serde_json`)
//! - Term definitions and context entries (the registry's vocabulary)

pub mod json;
pub mod term;
pub mod value;

pub use json::key_string;
pub use term::{ContextEntry, TermDefinition, ID_COERCION};
pub use value::{Object, Value, MAX_INTEGER, MIN_INTEGER};
