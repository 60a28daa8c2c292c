//! Term definitions and context entries.
//!
//! A context maps term names to definitions. Definitions arrive either as a
//! bare IRI string or as an object; both are normalized into one
//! [`TermDefinition`] when the context is ingested, so nothing downstream
//! looks at the raw shape again.

use indexmap::IndexMap;
use serde_json::{Map as JsonMap, Value as Json};

use crate::error::RegistryError;

/// Literal `@type` value meaning "the value is itself a reference".
pub const ID_COERCION: &str = "@id";

/// One vocabulary entry of a context.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TermDefinition {
    /// Expanded IRI (`@id`).
    pub id: Option<String>,
    /// Type coercion (`@type`).
    pub type_mapping: Option<String>,
    /// Container markers (`@container`), a single marker becomes one entry.
    pub container: Vec<String>,
    /// Default language (`@language`), `null` clears it.
    pub language: Option<String>,
    /// Type-scoped context (`@context`).
    pub context: Option<Json>,
    /// Inherited from the enclosing context's `@protected`.
    pub protected: bool,
}

impl TermDefinition {
    /// Creates a definition that only carries an IRI.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Normalizes a raw definition.
    ///
    /// Returns `Ok(None)` for a null definition, which is skipped by callers.
    pub fn from_json(term: &str, raw: &Json, protected: bool) -> Result<Option<Self>, RegistryError> {
        let mut definition = match raw {
            Json::Null => return Ok(None),
            Json::String(iri) => TermDefinition::with_id(iri.as_str()),
            Json::Object(members) => Self::from_members(term, members)?,
            _ => {
                return Err(RegistryError::InvalidTermDefinition {
                    term: term.to_string(),
                    reason: "expected a string, an object or null",
                });
            }
        };
        definition.protected = protected;
        Ok(Some(definition))
    }

    fn from_members(term: &str, members: &JsonMap<String, Json>) -> Result<Self, RegistryError> {
        let invalid = |reason| RegistryError::InvalidTermDefinition {
            term: term.to_string(),
            reason,
        };

        let id = match members.get("@id") {
            None | Some(Json::Null) => None,
            Some(Json::String(s)) => Some(s.clone()),
            Some(_) => return Err(invalid("@id must be a string")),
        };

        let type_mapping = match members.get("@type") {
            None | Some(Json::Null) => None,
            Some(Json::String(s)) => Some(s.clone()),
            Some(_) => return Err(invalid("@type must be a string")),
        };

        let container = match members.get("@container") {
            None | Some(Json::Null) => Vec::new(),
            Some(Json::String(s)) => vec![s.clone()],
            Some(Json::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| invalid("@container entries must be strings"))?,
            Some(_) => return Err(invalid("@container must be a string or an array")),
        };

        let language = match members.get("@language") {
            None | Some(Json::Null) => None,
            Some(Json::String(s)) => Some(s.clone()),
            Some(_) => return Err(invalid("@language must be a string or null")),
        };

        let context = match members.get("@context") {
            None | Some(Json::Null) => None,
            Some(ctx @ Json::Object(_)) => Some(ctx.clone()),
            Some(_) => return Err(invalid("nested @context must be an object")),
        };

        Ok(Self {
            id,
            type_mapping,
            container,
            language,
            context,
            protected: false,
        })
    }

    /// Returns true if values of this term are coerced to `{ "@id": value }`.
    pub fn is_id_reference(&self) -> bool {
        self.type_mapping.as_deref() == Some(ID_COERCION)
    }
}

/// A registered context: the raw structure plus its normalized term map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContextEntry {
    /// The context structure as ingested.
    pub context: Json,
    /// Term name → definition, in ascending term order.
    pub terms: IndexMap<String, TermDefinition>,
}

impl ContextEntry {
    /// Looks up a term definition.
    pub fn term(&self, name: &str) -> Option<&TermDefinition> {
        self.terms.get(name)
    }

    /// Returns the number of terms defined by this context.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if the context defines no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
