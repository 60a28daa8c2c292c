//! Value encoding/decoding for the binary item format.
//!
//! Integers use major types 0 and 1 (negatives stored as `-1 - n`), floats
//! are always written as 8-byte doubles, text and byte strings are length
//! prefixed, and mappings are written as pair counts followed by the pairs
//! in encounter order.
//!
//! Tags are read and discarded on decode: only the wrapped item is returned.
//! Tag numbers are not reconstructed, so a tagged item and its untagged
//! payload decode identically.

use tracing::trace;

use crate::codec::primitives::{simple, Major, Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::limits::MAX_NESTING_DEPTH;
use crate::model::{key_string, Object, Value};

/// Options for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Write all-digit text keys of plain keyed structures as unsigned
    /// integer keys.
    ///
    /// This makes dictionary-style objects (`{"0": .., "1": ..}`) compact,
    /// at the cost of not distinguishing a text key `"0"` from an integer
    /// key `0` after decoding. Digit runs that do not fit in 64 bits stay
    /// text.
    pub numeric_string_keys_as_ints: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            numeric_string_keys_as_ints: true,
        }
    }
}

impl EncodeOptions {
    /// Options that always write object keys as text.
    pub fn text_keys() -> Self {
        Self {
            numeric_string_keys_as_ints: false,
        }
    }
}

/// Shape of decoded mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapOutput {
    /// Plain keyed structure; integer keys become their decimal string.
    #[default]
    Object,
    /// Order-preserving key/value container; keys keep their decoded type.
    Pairs,
}

/// Options for decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    pub map_output: MapOutput,
}

impl DecodeOptions {
    /// Options that decode mappings as [`Value::Map`].
    pub fn pairs() -> Self {
        Self {
            map_output: MapOutput::Pairs,
        }
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a value with default options.
pub fn encode(value: &Value) -> Result<Vec<u8>, EncodeError> {
    encode_with_options(value, EncodeOptions::default())
}

/// Encodes a value.
pub fn encode_with_options(value: &Value, options: EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::new();
    encode_value(&mut writer, value, &options)?;
    Ok(writer.into_bytes())
}

/// Encodes a single item into the writer.
pub fn encode_value(writer: &mut Writer, value: &Value, options: &EncodeOptions) -> Result<(), EncodeError> {
    encode_item(writer, value, options, 0)
}

fn encode_item(
    writer: &mut Writer,
    value: &Value,
    options: &EncodeOptions,
    depth: usize,
) -> Result<(), EncodeError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(EncodeError::NestingTooDeep {
            max: MAX_NESTING_DEPTH,
        });
    }
    match value {
        Value::Null => writer.write_byte(simple::NULL),
        Value::Undefined => writer.write_byte(simple::UNDEFINED),
        Value::Bool(false) => writer.write_byte(simple::FALSE),
        Value::Bool(true) => writer.write_byte(simple::TRUE),
        Value::Integer(n) => encode_integer(writer, *n)?,
        Value::Float(f) => encode_float(writer, *f)?,
        Value::Text(s) => writer.write_text(s),
        Value::Bytes(b) => writer.write_byte_string(b),
        Value::Array(items) => {
            writer.write_head(Major::Array, items.len() as u64);
            for item in items {
                encode_item(writer, item, options, depth + 1)?;
            }
        }
        Value::Object(members) => {
            writer.write_head(Major::Map, members.len() as u64);
            for (key, item) in members {
                encode_object_key(writer, key, options);
                encode_item(writer, item, options, depth + 1)?;
            }
        }
        Value::Map(pairs) => {
            writer.write_head(Major::Map, pairs.len() as u64);
            for (key, item) in pairs {
                encode_item(writer, key, options, depth + 1)?;
                encode_item(writer, item, options, depth + 1)?;
            }
        }
    }
    Ok(())
}

fn encode_integer(writer: &mut Writer, n: i128) -> Result<(), EncodeError> {
    let out_of_range = |_| EncodeError::IntegerOutOfRange { value: n };
    if n >= 0 {
        writer.write_head(Major::Unsigned, u64::try_from(n).map_err(out_of_range)?);
    } else {
        writer.write_head(Major::Negative, u64::try_from(-1 - n).map_err(out_of_range)?);
    }
    Ok(())
}

/// Integral floats inside the integer range take the integer path.
fn encode_float(writer: &mut Writer, f: f64) -> Result<(), EncodeError> {
    const LOWER: f64 = -18_446_744_073_709_551_616.0;
    const UPPER: f64 = 18_446_744_073_709_551_616.0;

    if !f.is_finite() {
        return Err(EncodeError::NonFiniteFloat);
    }
    if f.fract() == 0.0 && (LOWER..UPPER).contains(&f) {
        return encode_integer(writer, f as i128);
    }
    writer.write_f64(f);
    Ok(())
}

fn encode_object_key(writer: &mut Writer, key: &str, options: &EncodeOptions) {
    if options.numeric_string_keys_as_ints && is_uint_string(key) {
        // Leading zeros are accepted; "007" is written as 7
        if let Ok(n) = key.parse::<u64>() {
            writer.write_head(Major::Unsigned, n);
            return;
        }
    }
    writer.write_text(key);
}

fn is_uint_string(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes exactly one top-level item with default options.
pub fn decode(bytes: &[u8]) -> Result<Value, DecodeError> {
    decode_with_options(bytes, DecodeOptions::default())
}

/// Decodes exactly one top-level item; trailing bytes are an error.
pub fn decode_with_options(bytes: &[u8], options: DecodeOptions) -> Result<Value, DecodeError> {
    let mut reader = Reader::new(bytes);
    let value = decode_value(&mut reader, &options)?;
    if !reader.is_empty() {
        return Err(DecodeError::TrailingBytes {
            remaining: reader.remaining_len(),
        });
    }
    Ok(value)
}

/// Decodes a single item from the reader.
pub fn decode_value(reader: &mut Reader<'_>, options: &DecodeOptions) -> Result<Value, DecodeError> {
    decode_item(reader, options, 0)
}

fn decode_item(reader: &mut Reader<'_>, options: &DecodeOptions, depth: usize) -> Result<Value, DecodeError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(DecodeError::NestingTooDeep {
            max: MAX_NESTING_DEPTH,
        });
    }

    let (major, info) = reader.read_head("item")?;
    match major {
        Major::Unsigned => {
            let n = reader.read_argument(major, info, "unsigned")?;
            Ok(Value::Integer(n as i128))
        }
        Major::Negative => {
            let n = reader.read_argument(major, info, "negative")?;
            Ok(Value::Integer(-1 - n as i128))
        }
        Major::Bytes => {
            let len = reader.read_length(major, info, "byte string")?;
            Ok(Value::Bytes(reader.read_bytes(len, "byte string")?.to_vec()))
        }
        Major::Text => {
            let len = reader.read_length(major, info, "text string")?;
            Ok(Value::Text(reader.read_text(len, "text string")?))
        }
        Major::Array => {
            let count = reader.read_length(major, info, "array")?;
            // Every item takes at least one byte
            let mut items = Vec::with_capacity(count.min(reader.remaining_len()));
            for _ in 0..count {
                items.push(decode_item(reader, options, depth + 1)?);
            }
            Ok(Value::Array(items))
        }
        Major::Map => {
            let count = reader.read_length(major, info, "map")?;
            let capacity = count.min(reader.remaining_len() / 2);
            match options.map_output {
                MapOutput::Object => {
                    let mut members = Object::with_capacity(capacity);
                    for _ in 0..count {
                        let key = decode_item(reader, options, depth + 1)?;
                        let item = decode_item(reader, options, depth + 1)?;
                        members.insert(key_string(&key), item);
                    }
                    Ok(Value::Object(members))
                }
                MapOutput::Pairs => {
                    let mut pairs = Vec::with_capacity(capacity);
                    for _ in 0..count {
                        let key = decode_item(reader, options, depth + 1)?;
                        let item = decode_item(reader, options, depth + 1)?;
                        pairs.push((key, item));
                    }
                    Ok(Value::Map(pairs))
                }
            }
        }
        Major::Tag => {
            let tag = reader.read_argument(major, info, "tag")?;
            trace!(tag, "discarding tag number");
            decode_item(reader, options, depth + 1)
        }
        Major::Simple => decode_simple(reader, info),
    }
}

fn decode_simple(reader: &mut Reader<'_>, info: u8) -> Result<Value, DecodeError> {
    match info {
        20 => Ok(Value::Bool(false)),
        21 => Ok(Value::Bool(true)),
        22 => Ok(Value::Null),
        23 => Ok(Value::Undefined),
        24 => {
            // One-byte simple values carry no meaning here
            let value = reader.read_byte("simple value")?;
            trace!(value, "one-byte simple value decoded as null");
            Ok(Value::Null)
        }
        25 => Err(DecodeError::HalfFloatUnsupported),
        26 => Ok(Value::Float(reader.read_f32("float32")? as f64)),
        27 => Ok(Value::Float(reader.read_f64("float64")?)),
        0..=19 => Err(DecodeError::UnassignedSimpleValue { value: info }),
        _ => Err(DecodeError::InvalidAdditionalInfo {
            major: Major::Simple as u8,
            info,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: &Value) -> Value {
        decode_with_options(&encode(value).unwrap(), DecodeOptions::pairs()).unwrap()
    }

    #[test]
    fn test_small_integers_inline() {
        assert_eq!(encode(&Value::Integer(0)).unwrap(), vec![0x00]);
        assert_eq!(encode(&Value::Integer(23)).unwrap(), vec![0x17]);
        assert_eq!(encode(&Value::Integer(24)).unwrap(), vec![0x18, 0x18]);
        assert_eq!(encode(&Value::Integer(-1)).unwrap(), vec![0x20]);
        assert_eq!(encode(&Value::Integer(-24)).unwrap(), vec![0x37]);
        assert_eq!(encode(&Value::Integer(-25)).unwrap(), vec![0x38, 0x18]);
    }

    #[test]
    fn test_negative_one_roundtrip() {
        let bytes = encode(&Value::Integer(-1)).unwrap();
        assert_eq!(bytes.len(), 1);
        assert_eq!(Major::from_head(bytes[0]), Major::Negative);
        assert_eq!(bytes[0] & 0x1f, 0);
        assert_eq!(decode(&bytes).unwrap(), Value::Integer(-1));
    }

    #[test]
    fn test_integer_roundtrip() {
        let values = [
            0i128,
            1,
            -1,
            255,
            256,
            65_535,
            65_536,
            u32::MAX as i128,
            u32::MAX as i128 + 1,
            i64::MAX as i128,
            i64::MIN as i128,
            u64::MAX as i128,
            -(u64::MAX as i128) - 1,
        ];
        for v in values {
            let value = Value::Integer(v);
            assert_eq!(roundtrip(&value), value, "failed for {}", v);
        }
    }

    #[test]
    fn test_integer_out_of_range() {
        let result = encode(&Value::Integer(u64::MAX as i128 + 1));
        assert!(matches!(result, Err(EncodeError::IntegerOutOfRange { .. })));

        let result = encode(&Value::Integer(-(u64::MAX as i128) - 2));
        assert!(matches!(result, Err(EncodeError::IntegerOutOfRange { .. })));
    }

    #[test]
    fn test_float_always_double() {
        let bytes = encode(&Value::Float(1.5)).unwrap();
        assert_eq!(bytes.len(), 9);
        assert_eq!(bytes[0], 0xfb);
        assert_eq!(decode(&bytes).unwrap(), Value::Float(1.5));

        // Values a shorter float could hold still use 8 bytes
        let bytes = encode(&Value::Float(0.5)).unwrap();
        assert_eq!(bytes.len(), 9);
    }

    #[test]
    fn test_integral_float_takes_integer_path() {
        assert_eq!(encode(&Value::Float(3.0)).unwrap(), vec![0x03]);
        assert_eq!(encode(&Value::Float(-2.0)).unwrap(), vec![0x21]);
        assert_eq!(decode(&[0x03]).unwrap(), Value::Integer(3));

        // Beyond the integer range the double form is kept
        let bytes = encode(&Value::Float(1e20)).unwrap();
        assert_eq!(bytes[0], 0xfb);
    }

    #[test]
    fn test_non_finite_float_rejected() {
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(encode(&Value::Float(f)), Err(EncodeError::NonFiniteFloat));
        }
    }

    #[test]
    fn test_literals() {
        assert_eq!(encode(&Value::Bool(false)).unwrap(), vec![0xf4]);
        assert_eq!(encode(&Value::Bool(true)).unwrap(), vec![0xf5]);
        assert_eq!(encode(&Value::Null).unwrap(), vec![0xf6]);
        assert_eq!(encode(&Value::Undefined).unwrap(), vec![0xf7]);
        for v in [Value::Bool(false), Value::Bool(true), Value::Null, Value::Undefined] {
            assert_eq!(roundtrip(&v), v);
        }
    }

    #[test]
    fn test_text_and_bytes_distinct() {
        let text = encode(&Value::from("ab")).unwrap();
        let bytes = encode(&Value::Bytes(b"ab".to_vec())).unwrap();
        assert_eq!(text, vec![0x62, b'a', b'b']);
        assert_eq!(bytes, vec![0x42, b'a', b'b']);
        assert_eq!(decode(&bytes).unwrap(), Value::Bytes(b"ab".to_vec()));
    }

    #[test]
    fn test_numeric_string_key_as_int() {
        let value: Value = [("0", Value::from("x"))].into_iter().collect();
        let bytes = encode(&value).unwrap();
        assert_eq!(bytes, vec![0xa1, 0x00, 0x61, b'x']);

        // Plain decode renders the integer key as its decimal string
        assert_eq!(decode(&bytes).unwrap(), value);

        // Pairs decode keeps the integer key
        let pairs = decode_with_options(&bytes, DecodeOptions::pairs()).unwrap();
        assert_eq!(pairs, Value::Map(vec![(Value::Integer(0), Value::from("x"))]));
    }

    #[test]
    fn test_numeric_string_keys_disabled() {
        let value: Value = [("0", Value::from("x"))].into_iter().collect();
        let bytes = encode_with_options(&value, EncodeOptions::text_keys()).unwrap();
        assert_eq!(bytes, vec![0xa1, 0x61, b'0', 0x61, b'x']);
    }

    #[test]
    fn test_oversized_digit_key_stays_text() {
        let key = "99999999999999999999999";
        let value: Value = [(key, Value::Null)].into_iter().collect();
        let pairs = decode_with_options(&encode(&value).unwrap(), DecodeOptions::pairs()).unwrap();
        assert_eq!(pairs, Value::Map(vec![(Value::from(key), Value::Null)]));
    }

    #[test]
    fn test_map_with_non_text_keys() {
        let value = Value::Map(vec![
            (Value::Integer(-3), Value::Bool(true)),
            (Value::Bool(false), Value::from("f")),
            (Value::Bytes(vec![1, 2]), Value::Null),
        ]);
        assert_eq!(roundtrip(&value), value);

        let plain = decode(&encode(&value).unwrap()).unwrap();
        let keys: Vec<_> = plain.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["-3", "false", "[1,2]"]);
    }

    #[test]
    fn test_object_encounter_order() {
        let value: Value = [("z", Value::Integer(1)), ("a", Value::Integer(2))]
            .into_iter()
            .collect();
        let bytes = encode(&value).unwrap();
        assert_eq!(bytes, vec![0xa2, 0x61, b'z', 0x01, 0x61, b'a', 0x02]);
    }

    #[test]
    fn test_nested_structures() {
        let inner: Value = [("list", Value::Array(vec![Value::Integer(1), Value::Float(2.5)]))]
            .into_iter()
            .collect();
        let value: Value = [("inner", inner), ("blob", Value::Bytes(vec![0, 255]))]
            .into_iter()
            .collect();
        assert_eq!(decode(&encode(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn test_tag_discarded() {
        // Tag 32 wrapping "hi"
        let bytes = [0xd8, 0x20, 0x62, b'h', b'i'];
        assert_eq!(decode(&bytes).unwrap(), Value::from("hi"));

        // Nested tags unwrap to the innermost payload
        let bytes = [0xc1, 0xc2, 0x05];
        assert_eq!(decode(&bytes).unwrap(), Value::Integer(5));
    }

    #[test]
    fn test_float32_widened() {
        let bytes = [0xfa, 0x3f, 0xc0, 0x00, 0x00];
        assert_eq!(decode(&bytes).unwrap(), Value::Float(1.5));
    }

    #[test]
    fn test_half_float_rejected() {
        let bytes = [0xf9, 0x3c, 0x00];
        assert_eq!(decode(&bytes), Err(DecodeError::HalfFloatUnsupported));
    }

    #[test]
    fn test_one_byte_simple_is_null() {
        assert_eq!(decode(&[0xf8, 0x20]).unwrap(), Value::Null);
    }

    #[test]
    fn test_unassigned_simple_rejected() {
        assert_eq!(
            decode(&[0xe0]),
            Err(DecodeError::UnassignedSimpleValue { value: 0 })
        );
    }

    #[test]
    fn test_indefinite_length_rejected() {
        for head in [0x5f, 0x7f, 0x9f, 0xbf, 0xff] {
            let result = decode(&[head]);
            assert!(
                matches!(result, Err(DecodeError::InvalidAdditionalInfo { info: 31, .. })),
                "accepted {:#x}",
                head
            );
        }
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        assert_eq!(
            decode(&[0x01, 0x02]),
            Err(DecodeError::TrailingBytes { remaining: 1 })
        );
    }

    #[test]
    fn test_truncated_input() {
        let cases: [&[u8]; 5] = [&[], &[0x19, 0x01], &[0x63, b'a'], &[0x82, 0x01], &[0xfb, 0, 0]];
        for bytes in cases {
            assert!(
                matches!(decode(bytes), Err(DecodeError::UnexpectedEof { .. })),
                "accepted {:?}",
                bytes
            );
        }
    }

    #[test]
    fn test_huge_declared_count_fails_cleanly() {
        // Array claiming 2^32 items with no payload
        let bytes = [0x9a, 0xff, 0xff, 0xff, 0xff];
        assert!(matches!(decode(&bytes), Err(DecodeError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_nesting_limit() {
        let mut bytes = vec![0x81; MAX_NESTING_DEPTH + 2];
        bytes.push(0x00);
        assert_eq!(
            decode(&bytes),
            Err(DecodeError::NestingTooDeep {
                max: MAX_NESTING_DEPTH
            })
        );
    }

    #[test]
    fn test_deepest_input_fits_small_stack() {
        // Arrays nested to exactly the limit, then the same plus one level
        let nested = |levels: usize| {
            let mut bytes = vec![0x81; levels];
            bytes.push(0x00);
            bytes
        };
        let accepted = nested(MAX_NESTING_DEPTH);
        let rejected = nested(MAX_NESTING_DEPTH + 1);

        let handle = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || {
                let value = decode(&accepted).unwrap();
                let bytes = encode(&value).unwrap();
                (bytes == accepted, decode(&rejected))
            })
            .unwrap();

        let (same, deeper) = handle.join().unwrap();
        assert!(same);
        assert_eq!(
            deeper,
            Err(DecodeError::NestingTooDeep {
                max: MAX_NESTING_DEPTH
            })
        );
    }

    #[test]
    fn test_duplicate_object_keys_last_wins() {
        // {"a": 1, "a": 2}
        let bytes = [0xa2, 0x61, b'a', 0x01, 0x61, b'a', 0x02];
        let value = decode(&bytes).unwrap();
        assert_eq!(value.get("a"), Some(&Value::Integer(2)));
        assert_eq!(value.as_object().unwrap().len(), 1);
    }
}
