//! Primitive encoding/decoding for the binary item format.
//!
//! Every item starts with a one-byte head: the top three bits select the
//! major type, the low five bits carry the additional info. Additional info
//! below 24 is the argument itself; 24, 25, 26 and 27 announce a 1, 2, 4 or
//! 8 byte big-endian argument.

use crate::error::DecodeError;
use crate::limits::MAX_SAFE_LENGTH;

/// Additional info announcing a one-byte argument.
pub const INFO_U8: u8 = 24;
/// Additional info announcing a two-byte argument.
pub const INFO_U16: u8 = 25;
/// Additional info announcing a four-byte argument.
pub const INFO_U32: u8 = 26;
/// Additional info announcing an eight-byte argument.
pub const INFO_U64: u8 = 27;

/// Major types (high three bits of the head byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Major {
    Unsigned = 0,
    Negative = 1,
    Bytes = 2,
    Text = 3,
    Array = 4,
    Map = 5,
    Tag = 6,
    Simple = 7,
}

impl Major {
    /// Extracts the major type from a head byte.
    pub fn from_head(head: u8) -> Major {
        match head >> 5 {
            0 => Major::Unsigned,
            1 => Major::Negative,
            2 => Major::Bytes,
            3 => Major::Text,
            4 => Major::Array,
            5 => Major::Map,
            6 => Major::Tag,
            _ => Major::Simple,
        }
    }
}

/// Head bytes of the single-byte literals.
pub mod simple {
    pub const FALSE: u8 = 0xf4;
    pub const TRUE: u8 = 0xf5;
    pub const NULL: u8 = 0xf6;
    pub const UNDEFINED: u8 = 0xf7;
    pub const FLOAT64: u8 = 0xfb;
}

// =============================================================================
// DECODING
// =============================================================================

/// Reader for decoding binary data.
///
/// Wraps a byte slice and provides methods for reading primitives
/// with bounds checking and error handling.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the remaining bytes.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Returns the number of remaining bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_byte(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        if self.pos >= self.data.len() {
            return Err(DecodeError::UnexpectedEof { context });
        }
        let byte = self.data[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Reads exactly n bytes.
    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining_len() {
            return Err(DecodeError::UnexpectedEof { context });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Reads a fixed-size big-endian field.
    #[inline]
    pub fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, context)?);
        Ok(out)
    }

    /// Reads a head byte, returning the major type and additional info.
    #[inline]
    pub fn read_head(&mut self, context: &'static str) -> Result<(Major, u8), DecodeError> {
        let head = self.read_byte(context)?;
        Ok((Major::from_head(head), head & 0x1f))
    }

    /// Reads the argument announced by `info`.
    pub fn read_argument(
        &mut self,
        major: Major,
        info: u8,
        context: &'static str,
    ) -> Result<u64, DecodeError> {
        match info {
            0..=23 => Ok(info as u64),
            INFO_U8 => Ok(self.read_byte(context)? as u64),
            INFO_U16 => Ok(u16::from_be_bytes(self.read_array(context)?) as u64),
            INFO_U32 => Ok(u32::from_be_bytes(self.read_array(context)?) as u64),
            INFO_U64 => Ok(u64::from_be_bytes(self.read_array(context)?)),
            _ => Err(DecodeError::InvalidAdditionalInfo {
                major: major as u8,
                info,
            }),
        }
    }

    /// Reads a length or count argument and checks it is addressable.
    pub fn read_length(
        &mut self,
        major: Major,
        info: u8,
        field: &'static str,
    ) -> Result<usize, DecodeError> {
        let len = self.read_argument(major, info, field)?;
        if len > MAX_SAFE_LENGTH {
            return Err(DecodeError::LengthExceedsLimit {
                field,
                len,
                max: MAX_SAFE_LENGTH,
            });
        }
        usize::try_from(len).map_err(|_| DecodeError::LengthExceedsLimit {
            field,
            len,
            max: usize::MAX as u64,
        })
    }

    /// Reads `len` bytes of UTF-8 text.
    pub fn read_text(&mut self, len: usize, field: &'static str) -> Result<String, DecodeError> {
        let bytes = self.read_bytes(len, field)?;
        // Validate on the borrowed slice, then allocate once
        std::str::from_utf8(bytes)
            .map(|s| s.to_string())
            .map_err(|_| DecodeError::InvalidUtf8 { field })
    }

    /// Reads a big-endian f32.
    #[inline]
    pub fn read_f32(&mut self, context: &'static str) -> Result<f32, DecodeError> {
        Ok(f32::from_be_bytes(self.read_array(context)?))
    }

    /// Reads a big-endian f64.
    #[inline]
    pub fn read_f64(&mut self, context: &'static str) -> Result<f64, DecodeError> {
        Ok(f64::from_be_bytes(self.read_array(context)?))
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for encoding binary data.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a head with the shortest argument encoding for `arg`.
    #[inline]
    pub fn write_head(&mut self, major: Major, arg: u64) {
        let m = (major as u8) << 5;
        if arg < 24 {
            self.buf.push(m | arg as u8);
        } else if arg <= u8::MAX as u64 {
            self.buf.extend_from_slice(&[m | INFO_U8, arg as u8]);
        } else if arg <= u16::MAX as u64 {
            self.buf.push(m | INFO_U16);
            self.buf.extend_from_slice(&(arg as u16).to_be_bytes());
        } else if arg <= u32::MAX as u64 {
            self.buf.push(m | INFO_U32);
            self.buf.extend_from_slice(&(arg as u32).to_be_bytes());
        } else {
            self.buf.push(m | INFO_U64);
            self.buf.extend_from_slice(&arg.to_be_bytes());
        }
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn write_text(&mut self, s: &str) {
        self.write_head(Major::Text, s.len() as u64);
        self.buf.extend_from_slice(s.as_bytes());
    }

    /// Writes a length-prefixed byte string.
    pub fn write_byte_string(&mut self, bytes: &[u8]) {
        self.write_head(Major::Bytes, bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a double-precision float item.
    pub fn write_f64(&mut self, value: f64) {
        self.buf.push(simple::FLOAT64);
        self.buf.extend_from_slice(&value.to_be_bytes());
    }
}
