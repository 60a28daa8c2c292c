//! Security limits and fixed layout constants.
//!
//! The decoder treats its input as untrusted; every allocation it makes is
//! bounded by the remaining input or by one of these limits.

/// Largest length or count the decoder will address (2^53 - 1).
pub const MAX_SAFE_LENGTH: u64 = (1 << 53) - 1;

/// Maximum nesting of sequences, mappings and tags.
///
/// Encoding and decoding recurse once per level; this keeps the deepest
/// accepted input within a 2 MiB thread stack in unoptimized builds.
pub const MAX_NESTING_DEPTH: usize = 128;

/// First id handed out to a non-keyword term.
pub const FIRST_TERM_ID: u64 = 100;

/// Distance between consecutively allocated term ids.
pub const TERM_ID_STEP: u64 = 2;

/// Suffix of the synthetic cache key for type-scoped nested contexts.
pub const NESTED_KEY_SUFFIX: &str = "::nested";

/// Magic bytes for the zstd compression envelope.
pub const MAGIC_COMPRESSED: &[u8; 4] = b"CBRZ";

/// Largest payload accepted back out of the compression envelope (64 MiB).
pub const MAX_DECOMPRESSED_SIZE: usize = 64 * 1024 * 1024;

/// Magic bytes opening every transport frame.
pub const FRAME_MAGIC: &[u8; 4] = b"CBR1";

/// Frame header: magic + total (u16 BE) + index (u16 BE) + hash prefix.
pub const FRAME_HEADER_LEN: usize = 16;

/// Number of SHA-256 bytes carried in each frame header.
pub const HASH_PREFIX_LEN: usize = 8;

/// Default payload bytes per frame.
pub const DEFAULT_CHUNK_BYTES: usize = 600;

/// Maximum number of frames addressable by the u16 header fields.
pub const MAX_FRAMES: usize = u16::MAX as usize;
