//! Chunked frames with a content-hash header.
//!
//! Every frame is a 16-byte header followed by a slice of the payload:
//!
//! ```text
//! magic "CBR1" | total: u16 BE | index: u16 BE | sha256(payload)[0..8]
//! ```
//!
//! All frames of one payload carry the same total and hash prefix, so a
//! receiver can collect them in any order and detect frames that belong to a
//! different payload.

use rustc_hash::FxHashMap;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::TransportError;
use crate::limits::{DEFAULT_CHUNK_BYTES, FRAME_HEADER_LEN, FRAME_MAGIC, HASH_PREFIX_LEN, MAX_FRAMES};

/// Options for [`split_frames`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOptions {
    /// Payload bytes per frame, header excluded.
    pub chunk_bytes: usize,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            chunk_bytes: DEFAULT_CHUNK_BYTES,
        }
    }
}

impl FrameOptions {
    pub fn with_chunk_bytes(chunk_bytes: usize) -> Self {
        Self { chunk_bytes }
    }
}

/// Decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHeader {
    pub total: u16,
    pub index: u16,
    pub hash_prefix: [u8; HASH_PREFIX_LEN],
}

impl FrameHeader {
    /// Splits a frame into its header and body.
    pub fn parse(frame: &[u8]) -> Result<(FrameHeader, &[u8]), TransportError> {
        if frame.len() < FRAME_HEADER_LEN {
            return Err(TransportError::FrameTooShort { len: frame.len() });
        }
        let (header, body) = frame.split_at(FRAME_HEADER_LEN);

        let mut found = [0u8; 4];
        found.copy_from_slice(&header[0..4]);
        if &found != FRAME_MAGIC {
            return Err(TransportError::InvalidMagic { found });
        }

        let total = u16::from_be_bytes([header[4], header[5]]);
        let index = u16::from_be_bytes([header[6], header[7]]);
        let mut hash_prefix = [0u8; HASH_PREFIX_LEN];
        hash_prefix.copy_from_slice(&header[8..FRAME_HEADER_LEN]);

        Ok((
            FrameHeader {
                total,
                index,
                hash_prefix,
            },
            body,
        ))
    }

    /// Serializes the header.
    pub fn to_bytes(&self) -> [u8; FRAME_HEADER_LEN] {
        let mut out = [0u8; FRAME_HEADER_LEN];
        out[0..4].copy_from_slice(FRAME_MAGIC);
        out[4..6].copy_from_slice(&self.total.to_be_bytes());
        out[6..8].copy_from_slice(&self.index.to_be_bytes());
        out[8..FRAME_HEADER_LEN].copy_from_slice(&self.hash_prefix);
        out
    }
}

fn hash_prefix(payload: &[u8]) -> [u8; HASH_PREFIX_LEN] {
    let hash = Sha256::digest(payload);
    let mut prefix = [0u8; HASH_PREFIX_LEN];
    prefix.copy_from_slice(&hash[..HASH_PREFIX_LEN]);
    prefix
}

/// Cuts a payload into frames.
///
/// A payload that fits in one chunk (the empty payload included) yields a
/// single frame.
pub fn split_frames(payload: &[u8], options: FrameOptions) -> Result<Vec<Vec<u8>>, TransportError> {
    if options.chunk_bytes == 0 {
        return Err(TransportError::InvalidChunkSize);
    }

    let count = payload.len().div_ceil(options.chunk_bytes).max(1);
    if count > MAX_FRAMES {
        return Err(TransportError::TooManyFrames {
            count,
            max: MAX_FRAMES,
        });
    }
    let total = count as u16;
    let prefix = hash_prefix(payload);

    let chunks: Vec<&[u8]> = if payload.is_empty() {
        vec![payload]
    } else {
        payload.chunks(options.chunk_bytes).collect()
    };

    let frames: Vec<Vec<u8>> = chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| {
            let header = FrameHeader {
                total,
                index: index as u16,
                hash_prefix: prefix,
            };
            let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + chunk.len());
            frame.extend_from_slice(&header.to_bytes());
            frame.extend_from_slice(chunk);
            frame
        })
        .collect();

    debug!(
        payload = payload.len(),
        frames = frames.len(),
        chunk_bytes = options.chunk_bytes,
        "split payload into frames"
    );
    Ok(frames)
}

/// Reassembles frames received in any order.
///
/// Frames must agree on total and hash prefix, indices must be in range and
/// unique, and the joined payload must match the hash prefix.
pub fn reassemble<F: AsRef<[u8]>>(frames: &[F]) -> Result<Vec<u8>, TransportError> {
    let Some(first) = frames.first() else {
        return Err(TransportError::NoFrames);
    };
    let (expected, _) = FrameHeader::parse(first.as_ref())?;

    let mut bodies: FxHashMap<u16, &[u8]> = FxHashMap::default();
    for frame in frames {
        let (header, body) = FrameHeader::parse(frame.as_ref())?;
        if header.total != expected.total {
            return Err(TransportError::TotalMismatch {
                expected: expected.total,
                found: header.total,
            });
        }
        if header.hash_prefix != expected.hash_prefix {
            return Err(TransportError::HashPrefixMismatch);
        }
        if header.index >= header.total {
            return Err(TransportError::IndexOutOfRange {
                index: header.index,
                total: header.total,
            });
        }
        if bodies.insert(header.index, body).is_some() {
            return Err(TransportError::DuplicateFrame {
                index: header.index,
            });
        }
    }

    let mut payload = Vec::new();
    for index in 0..expected.total {
        let body = bodies
            .get(&index)
            .ok_or(TransportError::MissingFrame { index })?;
        payload.extend_from_slice(body);
    }

    if hash_prefix(&payload) != expected.hash_prefix {
        return Err(TransportError::HashMismatch);
    }
    Ok(payload)
}
