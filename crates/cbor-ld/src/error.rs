//! Error types for encoding/decoding, context registration and projection.

use thiserror::Error;

/// Stable error codes shared by every error type in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Invalid registry construction
    InvalidStrategy,
    /// E002: Malformed binary input
    MalformedBinary,
    /// E003: Term definition without a resolvable IRI
    UnresolvedTerm,
    /// E004: Remote context could not be resolved
    ResolutionFailure,
    /// E005: Context or term definition has an unsupported shape
    InvalidContext,
    /// E006: Value cannot be represented in the target form
    Unrepresentable,
    /// E007: Frame set failed integrity checks
    FrameIntegrity,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidStrategy => "E001",
            ErrorCode::MalformedBinary => "E002",
            ErrorCode::UnresolvedTerm => "E003",
            ErrorCode::ResolutionFailure => "E004",
            ErrorCode::InvalidContext => "E005",
            ErrorCode::Unrepresentable => "E006",
            ErrorCode::FrameIntegrity => "E007",
        }
    }
}

/// Error during binary decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("[E002] unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("[E002] invalid additional info {info} for major type {major}")]
    InvalidAdditionalInfo { major: u8, info: u8 },

    #[error("[E002] unassigned simple value {value}")]
    UnassignedSimpleValue { value: u8 },

    #[error("[E002] half-precision floats are not supported")]
    HalfFloatUnsupported,

    #[error("[E002] {field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: u64,
        max: u64,
    },

    #[error("[E002] {remaining} extra bytes after top-level item")]
    TrailingBytes { remaining: usize },

    #[error("[E002] invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    #[error("[E002] nesting depth exceeds maximum {max}")]
    NestingTooDeep { max: usize },

    // === Compression envelope ===
    #[error("[E002] invalid magic bytes: expected CBRZ, found {found:?}")]
    InvalidMagic { found: [u8; 4] },

    #[error("[E002] zstd decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("[E002] decompressed size {actual} doesn't match declared {declared}")]
    UncompressedSizeMismatch { declared: usize, actual: usize },
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::MalformedBinary
    }
}

/// Error during binary encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("[E006] integer {value} is outside the 64-bit magnitude range")]
    IntegerOutOfRange { value: i128 },

    #[error("[E006] float value is not finite")]
    NonFiniteFloat,

    #[error("[E006] nesting depth exceeds maximum {max}")]
    NestingTooDeep { max: usize },

    #[error("[E006] zstd compression failed: {0}")]
    CompressionFailed(String),
}

impl EncodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::Unrepresentable
    }
}

/// Error converting between the codec value model and JSON.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("[E006] byte strings have no JSON representation")]
    BytesNotRepresentable,

    #[error("[E006] float value is not finite")]
    NonFiniteFloat,

    #[error("[E006] integer {value} does not fit a JSON number")]
    IntegerOutOfRange { value: i128 },
}

impl ConversionError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::Unrepresentable
    }
}

/// Error while building or querying a context registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("[E001] invalid strategy: {name:?} (expected \"compression\" or \"decompression\")")]
    InvalidStrategy { name: String },

    #[error("[E004] failed to resolve context {url}: {message}")]
    ResolutionFailed { url: String, message: String },

    #[error("[E004] document resolved from {url} has no @context member")]
    MissingContext { url: String },

    #[error("[E005] context {key:?} must be an object, found {found}")]
    InvalidContext { key: String, found: &'static str },

    #[error("[E005] term {term:?} has an invalid definition: {reason}")]
    InvalidTermDefinition { term: String, reason: &'static str },
}

impl RegistryError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            RegistryError::InvalidStrategy { .. } => ErrorCode::InvalidStrategy,
            RegistryError::ResolutionFailed { .. } | RegistryError::MissingContext { .. } => {
                ErrorCode::ResolutionFailure
            }
            RegistryError::InvalidContext { .. } | RegistryError::InvalidTermDefinition { .. } => {
                ErrorCode::InvalidContext
            }
        }
    }
}

/// Error during document projection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("[E003] term {term:?} is defined without an @id")]
    UnresolvedTerm { term: String },
}

impl ProjectionError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::UnresolvedTerm
    }
}

/// Error while splitting or reassembling transport frames.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("[E007] chunk size must be non-zero")]
    InvalidChunkSize,

    #[error("[E007] payload needs {count} frames, maximum is {max}")]
    TooManyFrames { count: usize, max: usize },

    #[error("[E007] no frames to reassemble")]
    NoFrames,

    #[error("[E007] frame of {len} bytes is shorter than the header")]
    FrameTooShort { len: usize },

    #[error("[E007] invalid frame magic: expected CBR1, found {found:?}")]
    InvalidMagic { found: [u8; 4] },

    #[error("[E007] frame declares {found} total frames, expected {expected}")]
    TotalMismatch { expected: u16, found: u16 },

    #[error("[E007] frame index {index} out of range for {total} frames")]
    IndexOutOfRange { index: u16, total: u16 },

    #[error("[E007] duplicate frame index {index}")]
    DuplicateFrame { index: u16 },

    #[error("[E007] missing frame index {index}")]
    MissingFrame { index: u16 },

    #[error("[E007] content hash prefix mismatch between frames")]
    HashPrefixMismatch,

    #[error("[E007] reassembled payload does not match its content hash")]
    HashMismatch,
}

impl TransportError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::FrameIntegrity
    }
}
