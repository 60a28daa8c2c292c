//! Binary encoding/decoding of structured values.
//!
//! The format is a compact typed item stream: one head byte per item
//! (major type + additional info), a big-endian argument, then payload.

pub mod primitives;
pub mod value;

pub use primitives::{Major, Reader, Writer};
pub use value::{
    decode, decode_value, decode_with_options, encode, encode_value, encode_with_options,
    DecodeOptions, EncodeOptions, MapOutput,
};
