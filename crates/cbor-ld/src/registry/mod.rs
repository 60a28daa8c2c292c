//! Context registry: deterministic term ids for JSON-LD vocabularies.
//!
//! A [`ContextRegistry`] walks context documents and hands every new term
//! the next free id. Ids start at [`FIRST_TERM_ID`] and grow by
//! [`TERM_ID_STEP`], so they interleave with the even keyword ids and leave
//! odd ids free. Terms of one context are visited in ascending lexicographic
//! order, which makes the assignment a pure function of the contexts loaded
//! and the order they were loaded in: a producer and a consumer agree on ids
//! without exchanging them.
//!
//! One registry belongs to one processing session. Loading mutates it, so a
//! registry has a single writer (`&mut self`); nothing is shared between
//! registries.

pub mod keywords;
pub mod resolver;

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde_json::{Map as JsonMap, Value as Json};
use tracing::{debug, trace};

use crate::error::RegistryError;
use crate::limits::{FIRST_TERM_ID, NESTED_KEY_SUFFIX, TERM_ID_STEP};
use crate::model::{ContextEntry, TermDefinition};

pub use keywords::{is_keyword, keyword_id, KEYWORDS};
pub use resolver::{ContextResolver, StaticResolver, UnknownContext};

/// Which direction the dictionary serves.
///
/// Only `Decompression` maintains the id → term table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Compression,
    Decompression,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Compression => "compression",
            Strategy::Decompression => "decompression",
        }
    }
}

impl FromStr for Strategy {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compression" => Ok(Strategy::Compression),
            "decompression" => Ok(Strategy::Decompression),
            _ => Err(RegistryError::InvalidStrategy { name: s.to_string() }),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the synthetic cache key of a term's type-scoped context.
pub fn nested_key(term: &str) -> String {
    format!("{term}{NESTED_KEY_SUFFIX}")
}

/// Session-scoped term dictionary and context cache.
#[derive(Debug)]
pub struct ContextRegistry {
    strategy: Strategy,
    term_ids: FxHashMap<String, u64>,
    id_terms: Option<FxHashMap<u64, String>>,
    contexts: IndexMap<String, ContextEntry>,
    next_id: u64,
}

impl ContextRegistry {
    /// Creates a registry seeded with the keyword table.
    pub fn new(strategy: Strategy) -> Self {
        let term_ids: FxHashMap<String, u64> = KEYWORDS
            .iter()
            .map(|(term, id)| (term.to_string(), *id))
            .collect();
        let id_terms = match strategy {
            Strategy::Compression => None,
            Strategy::Decompression => Some(
                term_ids
                    .iter()
                    .map(|(term, id)| (*id, term.clone()))
                    .collect(),
            ),
        };

        Self {
            strategy,
            term_ids,
            id_terms,
            contexts: IndexMap::new(),
            next_id: FIRST_TERM_ID,
        }
    }

    /// Creates a registry from a strategy name.
    ///
    /// Anything other than `"compression"` or `"decompression"` is rejected.
    pub fn from_strategy_name(name: &str) -> Result<Self, RegistryError> {
        Ok(Self::new(name.parse()?))
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns the id the next new term will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Looks up the id of a term or keyword.
    pub fn term_id(&self, term: &str) -> Option<u64> {
        self.term_ids.get(term).copied()
    }

    /// Looks up the term for an id. Always `None` under
    /// [`Strategy::Compression`].
    pub fn term_for_id(&self, id: u64) -> Option<&str> {
        self.id_terms.as_ref()?.get(&id).map(String::as_str)
    }

    /// Term → id table, keywords included.
    pub fn term_table(&self) -> &FxHashMap<String, u64> {
        &self.term_ids
    }

    /// Id → term table, present only under [`Strategy::Decompression`].
    pub fn reverse_table(&self) -> Option<&FxHashMap<u64, String>> {
        self.id_terms.as_ref()
    }

    /// Looks up a cached context entry.
    pub fn context(&self, key: &str) -> Option<&ContextEntry> {
        self.contexts.get(key)
    }

    /// Iterates over cached contexts in the order they were registered.
    pub fn contexts(&self) -> impl Iterator<Item = (&str, &ContextEntry)> {
        self.contexts.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of cached contexts.
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Loads a context given inline or by URL.
    ///
    /// A URL that is already cached is answered from the cache without
    /// calling `resolver`. Otherwise the resolver is called exactly once and
    /// nothing is allocated until its document is available, so dropping
    /// the returned future leaves the registry untouched.
    pub async fn load_context<R: ContextResolver>(
        &mut self,
        resolver: &R,
        identifier: &Json,
    ) -> Result<&ContextEntry, RegistryError> {
        match identifier {
            Json::String(url) => {
                if let Some(index) = self.contexts.get_index_of(url.as_str()) {
                    debug!(url = %url, "context cache hit");
                    return Ok(&self.contexts[index]);
                }

                debug!(url = %url, "resolving remote context");
                let document = resolver.resolve(url).await.map_err(|e| {
                    RegistryError::ResolutionFailed {
                        url: url.clone(),
                        message: e.to_string(),
                    }
                })?;
                let context = match document.get("@context") {
                    None | Some(Json::Null) => {
                        return Err(RegistryError::MissingContext { url: url.clone() });
                    }
                    Some(context) => context.clone(),
                };
                self.add_context(&context, url)
            }
            Json::Object(_) => self.add_context(identifier, ""),
            other => Err(RegistryError::InvalidContext {
                key: other.to_string(),
                found: json_kind(other),
            }),
        }
    }

    /// Loads every entry of a document's `@context` member, in order.
    ///
    /// The member may be a single URL, a single inline context or an array
    /// of them; null entries are skipped. A missing member loads nothing.
    pub async fn load_document_contexts<R: ContextResolver>(
        &mut self,
        resolver: &R,
        document: &Json,
    ) -> Result<(), RegistryError> {
        match document.get("@context") {
            None | Some(Json::Null) => Ok(()),
            Some(Json::Array(items)) => {
                for item in items.iter().filter(|item| !item.is_null()) {
                    self.load_context(resolver, item).await?;
                }
                Ok(())
            }
            Some(identifier) => self.load_context(resolver, identifier).await.map(|_| ()),
        }
    }

    /// Registers an inline context under `cache_key`.
    ///
    /// An empty `cache_key` stores the entry under the context's canonical
    /// serialization, so structurally identical anonymous contexts share one
    /// entry. A key that is already cached is returned as-is.
    ///
    /// Registration is atomic: on error neither ids nor cache entries from
    /// this call are kept.
    pub fn add_context(&mut self, context: &Json, cache_key: &str) -> Result<&ContextEntry, RegistryError> {
        let members = match context {
            Json::Object(members) => members,
            other => {
                return Err(RegistryError::InvalidContext {
                    key: cache_key.to_string(),
                    found: json_kind(other),
                });
            }
        };

        let key = if cache_key.is_empty() {
            canonical_json(context)
        } else {
            cache_key.to_string()
        };
        if let Some(index) = self.contexts.get_index_of(&key) {
            debug!(key = %key, "context already registered");
            return Ok(&self.contexts[index]);
        }

        let mut allocation = Allocation::new(self);
        let entry = allocation.register(members, context)?;
        let Allocation {
            next_id,
            new_terms,
            new_entries,
            ..
        } = allocation;

        debug!(
            key = %key,
            terms = entry.len(),
            allocated = new_terms.len(),
            nested = new_entries.len(),
            "registered context"
        );

        self.next_id = next_id;
        for (term, id) in new_terms {
            trace!(term = %term, id, "allocated term id");
            if let Some(id_terms) = self.id_terms.as_mut() {
                id_terms.insert(id, term.clone());
            }
            self.term_ids.insert(term, id);
        }
        for (nested, nested_entry) in new_entries {
            self.contexts.entry(nested).or_insert(nested_entry);
        }
        Ok(self.contexts.entry(key).or_insert(entry))
    }
}

/// Pending changes of one `add_context` call.
///
/// Lookups see the registry plus everything staged so far; the caller
/// applies the staged ids and entries only once registration succeeded.
struct Allocation<'r> {
    registry: &'r ContextRegistry,
    next_id: u64,
    new_terms: IndexMap<String, u64>,
    new_entries: IndexMap<String, ContextEntry>,
}

impl<'r> Allocation<'r> {
    fn new(registry: &'r ContextRegistry) -> Self {
        Self {
            registry,
            next_id: registry.next_id,
            new_terms: IndexMap::new(),
            new_entries: IndexMap::new(),
        }
    }

    fn is_allocated(&self, term: &str) -> bool {
        self.registry.term_ids.contains_key(term) || self.new_terms.contains_key(term)
    }

    fn has_entry(&self, key: &str) -> bool {
        self.registry.contexts.contains_key(key) || self.new_entries.contains_key(key)
    }

    fn register(&mut self, members: &JsonMap<String, Json>, context: &Json) -> Result<ContextEntry, RegistryError> {
        let protected = matches!(members.get("@protected"), Some(Json::Bool(true)));

        let mut sorted: Vec<(&String, &Json)> = members
            .iter()
            .filter(|(term, _)| !is_keyword(term))
            .collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let mut entry = ContextEntry {
            context: context.clone(),
            terms: IndexMap::with_capacity(sorted.len()),
        };

        for (term, raw) in sorted {
            let Some(definition) = TermDefinition::from_json(term, raw, protected)? else {
                continue;
            };

            // Nested terms are allocated before the term that scopes them
            if let Some(nested @ Json::Object(nested_members)) = &definition.context {
                let key = nested_key(term);
                let nested_entry = self.register(nested_members, nested)?;
                if self.has_entry(&key) {
                    trace!(key = %key, "type-scoped context already registered, keeping first");
                } else {
                    self.new_entries.insert(key, nested_entry);
                }
            }

            if !self.is_allocated(term) {
                self.new_terms.insert(term.clone(), self.next_id);
                self.next_id += TERM_ID_STEP;
            }

            entry.terms.insert(term.clone(), definition);
        }

        Ok(entry)
    }
}

/// Serializes JSON with object keys sorted at every level.
pub fn canonical_json(value: &Json) -> String {
    canonicalize(value).to_string()
}

fn canonicalize(value: &Json) -> Json {
    match value {
        Json::Object(members) => {
            let mut sorted: Vec<(&String, &Json)> = members.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            Json::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonicalize(v)))
                    .collect(),
            )
        }
        Json::Array(items) => Json::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
