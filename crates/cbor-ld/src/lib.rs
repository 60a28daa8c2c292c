//! CBOR-LD dictionary core: a compact binary codec plus the deterministic
//! term dictionary that CBOR-LD-style compression is built on.
//!
//! This crate provides the pieces a CBOR-LD encoder and decoder share: a
//! binary item codec, a context registry that gives every JSON-LD term a
//! stable integer id, and a projector that expands compacted documents.
//!
//! # Overview
//!
//! - **Deterministic ids**: identical contexts loaded in the same order give
//!   identical term tables on every machine
//! - **Injected I/O**: remote contexts are fetched through a caller-supplied
//!   [`ContextResolver`]
//! - **Untrusted input**: the decoder bounds every length and nesting level
//!
//! # Quick Start
//!
//! ```rust
//! use cbor_ld::{ContextRegistry, Strategy, Value};
//! use cbor_ld::codec::{decode, encode};
//! use serde_json::json;
//!
//! // Build the dictionary from an inline context
//! let mut registry = ContextRegistry::new(Strategy::Compression);
//! registry
//!     .add_context(&json!({ "name": "https://schema.org/name" }), "")
//!     .unwrap();
//! assert_eq!(registry.term_id("name"), Some(100));
//!
//! // Expand a compacted document
//! let document = json!({ "name": "Alice" });
//! let expanded = cbor_ld::projector::parse_value(&document, &registry).unwrap();
//! assert_eq!(expanded, json!({ "https://schema.org/name": "Alice" }));
//!
//! // Encode to binary and back
//! let value = Value::from(&expanded);
//! let bytes = encode(&value).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), value);
//! ```
//!
//! # Modules
//!
//! - [`codec`]: Binary encoding/decoding of [`Value`]s
//! - [`model`]: Value model, JSON bridge, term definitions
//! - [`registry`]: Context loading and term id allocation
//! - [`projector`]: Key expansion of compacted documents
//! - [`transport`]: zstd envelope and hash-checked frames
//! - [`error`]: Error types
//! - [`limits`]: Security limits and layout constants
//!
//! # Security
//!
//! The decoder is designed to safely handle untrusted input:
//! - Lengths above 2^53 - 1 and beyond the remaining input are rejected
//! - Nesting is capped at [`limits::MAX_NESTING_DEPTH`]
//! - Trailing bytes after the top-level item are an error
//!
//! # Wire Format
//!
//! Each item is a head byte (3-bit major type, 5-bit additional info)
//! followed by a big-endian argument of 0, 1, 2, 4 or 8 bytes and its
//! payload. Floats are always written as 8-byte doubles. Tags are accepted
//! on decode and discarded.
//!
//! Downstream of the codec, payloads can be wrapped in a `CBRZ` zstd
//! envelope and cut into `CBR1` frames.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod projector;
pub mod registry;
pub mod transport;

// Re-export commonly used types at crate root
pub use codec::{decode, decode_with_options, encode, encode_with_options, DecodeOptions, EncodeOptions, MapOutput};
pub use error::{ConversionError, DecodeError, EncodeError, ErrorCode, ProjectionError, RegistryError, TransportError};
pub use model::{ContextEntry, Object, TermDefinition, Value};
pub use registry::{ContextRegistry, ContextResolver, StaticResolver, Strategy};
pub use transport::{compress, decompress, reassemble, split_frames, FrameHeader, FrameOptions};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
