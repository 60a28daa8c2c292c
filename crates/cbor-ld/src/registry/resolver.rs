//! Remote context resolution.
//!
//! The registry never performs I/O itself. Callers inject a
//! [`ContextResolver`] that turns a context URL into a JSON document; how
//! that happens (HTTP, bundled files, a cache) and any timeout or retry
//! policy belong to the implementation.

use std::future::Future;

use rustc_hash::FxHashMap;
use serde_json::Value as Json;
use thiserror::Error;

/// Turns a context URL into the JSON document published at that URL.
pub trait ContextResolver: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches the document for `url`. The registry extracts its
    /// `@context` member.
    fn resolve(&self, url: &str) -> impl Future<Output = Result<Json, Self::Error>> + Send;
}

/// No document is registered for the requested URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no document registered for {url}")]
pub struct UnknownContext {
    pub url: String,
}

/// In-memory resolver over a fixed set of documents.
///
/// Useful for bundled contexts that must be available offline.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    documents: FxHashMap<String, Json>,
}

impl StaticResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the document served for `url`, replacing any previous one.
    pub fn insert(&mut self, url: impl Into<String>, document: Json) {
        self.documents.insert(url.into(), document);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_document(mut self, url: impl Into<String>, document: Json) -> Self {
        self.insert(url, document);
        self
    }

    /// Returns the number of registered documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if no documents are registered.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl ContextResolver for StaticResolver {
    type Error = UnknownContext;

    async fn resolve(&self, url: &str) -> Result<Json, Self::Error> {
        self.documents.get(url).cloned().ok_or_else(|| UnknownContext {
            url: url.to_string(),
        })
    }
}
