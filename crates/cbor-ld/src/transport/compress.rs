//! zstd compression envelope.
//!
//! Layout: magic `CBRZ`, the uncompressed length as an unsigned-integer
//! head, then one zstd frame.

use std::io::Read;

use crate::codec::{Major, Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{MAGIC_COMPRESSED, MAX_DECOMPRESSED_SIZE};

/// Compresses `payload` at the given zstd level.
pub fn compress(payload: &[u8], level: i32) -> Result<Vec<u8>, EncodeError> {
    let compressed = zstd::encode_all(payload, level)
        .map_err(|e| EncodeError::CompressionFailed(e.to_string()))?;

    let mut writer = Writer::with_capacity(MAGIC_COMPRESSED.len() + 9 + compressed.len());
    writer.write_bytes(MAGIC_COMPRESSED);
    writer.write_head(Major::Unsigned, payload.len() as u64);
    writer.write_bytes(&compressed);
    Ok(writer.into_bytes())
}

/// Opens a compression envelope.
///
/// The declared size is checked against [`MAX_DECOMPRESSED_SIZE`] before
/// anything is inflated, and against the actual output afterwards.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut reader = Reader::new(input);
    let found: [u8; 4] = reader.read_array("magic")?;
    if &found != MAGIC_COMPRESSED {
        return Err(DecodeError::InvalidMagic { found });
    }

    let (major, info) = reader.read_head("uncompressed_size")?;
    if major != Major::Unsigned {
        return Err(DecodeError::DecompressionFailed(format!(
            "size header has major type {}, expected unsigned",
            major as u8
        )));
    }
    let declared = reader.read_length(major, info, "uncompressed_size")?;
    if declared > MAX_DECOMPRESSED_SIZE {
        return Err(DecodeError::LengthExceedsLimit {
            field: "uncompressed_size",
            len: declared as u64,
            max: MAX_DECOMPRESSED_SIZE as u64,
        });
    }

    let decoder = zstd::Decoder::new(reader.remaining())
        .map_err(|e| DecodeError::DecompressionFailed(e.to_string()))?;

    // One byte past the declared size is enough to detect a lying header
    let mut decompressed = Vec::with_capacity(declared);
    decoder
        .take(declared as u64 + 1)
        .read_to_end(&mut decompressed)
        .map_err(|e| DecodeError::DecompressionFailed(e.to_string()))?;

    if decompressed.len() != declared {
        return Err(DecodeError::UncompressedSizeMismatch {
            declared,
            actual: decompressed.len(),
        });
    }

    Ok(decompressed)
}
