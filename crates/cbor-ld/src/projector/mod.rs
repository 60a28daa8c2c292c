//! Document projection: rewrites compacted keys to their expanded IRIs.
//!
//! Projection reads a finished [`ContextRegistry`] and never changes it.
//! Every node is scoped on its own: the contexts registered for the node's
//! declared types are consulted first, then every cached context in the
//! order it was registered.

use serde_json::{Map as JsonMap, Value as Json};

use crate::error::ProjectionError;
use crate::limits::NESTED_KEY_SUFFIX;
use crate::model::{ContextEntry, TermDefinition};
use crate::registry::{nested_key, ContextRegistry};

const TYPE_KEYWORD: &str = "@type";
const ID_KEYWORD: &str = "@id";

/// Projects a compacted document.
///
/// The `@context` member is dropped. Keys without a definition are kept
/// unchanged; a key whose definition has no `@id` is an error.
pub fn parse(
    document: &JsonMap<String, Json>,
    registry: &ContextRegistry,
) -> Result<JsonMap<String, Json>, ProjectionError> {
    Projector::new(registry).node(document)
}

/// Projects any JSON value.
///
/// Objects are projected as nodes, arrays element-wise; scalars are
/// returned as-is.
pub fn parse_value(value: &Json, registry: &ContextRegistry) -> Result<Json, ProjectionError> {
    Projector::new(registry).value(value)
}

struct Projector<'r> {
    registry: &'r ContextRegistry,
}

impl<'r> Projector<'r> {
    fn new(registry: &'r ContextRegistry) -> Self {
        Self { registry }
    }

    fn value(&self, value: &Json) -> Result<Json, ProjectionError> {
        match value {
            Json::Object(node) => Ok(Json::Object(self.node(node)?)),
            Json::Array(items) => Ok(Json::Array(self.elements(items)?)),
            other => Ok(other.clone()),
        }
    }

    fn node(&self, node: &JsonMap<String, Json>) -> Result<JsonMap<String, Json>, ProjectionError> {
        let scopes = self.type_scopes(node);
        let mut out = JsonMap::with_capacity(node.len());

        for (key, value) in node {
            if key == "@context" {
                continue;
            }

            let definition = scopes
                .iter()
                .find_map(|entry| entry.term(key))
                .or_else(|| self.global(key));

            let expanded = match definition {
                Some(definition) => definition
                    .id
                    .clone()
                    .ok_or_else(|| ProjectionError::UnresolvedTerm { term: key.clone() })?,
                None => key.clone(),
            };

            let projected = match value {
                Json::Object(child) => Json::Object(self.node(child)?),
                Json::Array(items) => Json::Array(self.elements(items)?),
                Json::String(reference) if definition.is_some_and(TermDefinition::is_id_reference) => {
                    let mut wrapped = JsonMap::with_capacity(1);
                    wrapped.insert(ID_KEYWORD.to_string(), Json::String(reference.clone()));
                    Json::Object(wrapped)
                }
                other => other.clone(),
            };

            out.insert(expanded, projected);
        }

        Ok(out)
    }

    /// Object elements are projected; everything else is kept.
    fn elements(&self, items: &[Json]) -> Result<Vec<Json>, ProjectionError> {
        items
            .iter()
            .map(|item| match item {
                Json::Object(child) => self.node(child).map(Json::Object),
                other => Ok(other.clone()),
            })
            .collect()
    }

    /// First definition of `term` across all cached contexts.
    ///
    /// Type-scoped entries are registered ahead of the context that declares
    /// them, so they are only consulted once no top-level context matches.
    fn global(&self, term: &str) -> Option<&'r TermDefinition> {
        let lookup = |scoped: bool| {
            self.registry
                .contexts()
                .filter(move |(key, _)| key.ends_with(NESTED_KEY_SUFFIX) == scoped)
                .find_map(|(_, entry)| entry.term(term))
        };
        lookup(false).or_else(|| lookup(true))
    }

    /// Type-scoped contexts for the types this node declares, in
    /// declaration order.
    fn type_scopes(&self, node: &JsonMap<String, Json>) -> Vec<&'r ContextEntry> {
        let mut scopes = Vec::new();
        for (key, value) in node {
            if !self.declares_type(key) {
                continue;
            }
            let types: Vec<&str> = match value {
                Json::String(name) => vec![name.as_str()],
                Json::Array(items) => items.iter().filter_map(Json::as_str).collect(),
                _ => continue,
            };
            for name in types {
                if let Some(entry) = self.registry.context(&nested_key(name)) {
                    scopes.push(entry);
                }
            }
        }
        scopes
    }

    /// `@type` itself, or a term aliased to it.
    fn declares_type(&self, key: &str) -> bool {
        key == TYPE_KEYWORD
            || self
                .global(key)
                .is_some_and(|definition| definition.id.as_deref() == Some(TYPE_KEYWORD))
    }
}
