// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion between payload registers and typed values.
//!
//! The coupler transfers CoE data as little-endian byte strings packed into
//! registers: the low byte of each register comes first and the least
//! significant register comes first.

use byteorder::{ByteOrder as _, LittleEndian};

use crate::{DecodeError, ScalarType, Value, Word};

/// Decode the payload registers of a completed transaction.
///
/// Fixed width types need [`ScalarType::payload_words`] registers, any
/// further registers are ignored. Strings end at the first NUL byte or
/// after the last register.
pub fn decode(ty: ScalarType, words: &[Word]) -> Result<Value, DecodeError> {
    if let Some(expected) = ty.payload_words() {
        if words.len() < expected {
            return Err(DecodeError::Truncated {
                ty,
                expected,
                actual: words.len(),
            });
        }
    }
    let value = match ty {
        // Single register types are taken as-is
        ScalarType::Int8 => Value::Int8(words[0] as i16),
        ScalarType::UInt8 => Value::UInt8(words[0]),
        ScalarType::Int16 => Value::Int16(words[0] as i16),
        ScalarType::UInt16 => Value::UInt16(words[0]),
        ScalarType::Bool => Value::Bool(words[0] != 0),
        ScalarType::Int32 => Value::Int32(LittleEndian::read_i32(&to_bytes(&words[..2]))),
        ScalarType::UInt32 => Value::UInt32(LittleEndian::read_u32(&to_bytes(&words[..2]))),
        ScalarType::Float32 => Value::Float32(LittleEndian::read_f32(&to_bytes(&words[..2]))),
        ScalarType::Int64 => Value::Int64(LittleEndian::read_i64(&to_bytes(&words[..4]))),
        ScalarType::UInt64 => Value::UInt64(LittleEndian::read_u64(&to_bytes(&words[..4]))),
        ScalarType::Float64 => Value::Float64(LittleEndian::read_f64(&to_bytes(&words[..4]))),
        ScalarType::String => Value::String(decode_string(words)),
    };
    Ok(value)
}

/// Encode a value into the payload registers a coupler would return for it.
///
/// This is the inverse of [`decode()`]. Strings are NUL padded to whole
/// registers.
#[must_use]
pub fn encode(value: &Value) -> Vec<Word> {
    match value {
        Value::Int8(v) | Value::Int16(v) => vec![*v as Word],
        Value::UInt8(v) | Value::UInt16(v) => vec![*v],
        Value::Bool(v) => vec![Word::from(*v)],
        Value::Int32(v) => {
            let mut buf = [0; 4];
            LittleEndian::write_i32(&mut buf, *v);
            to_words(&buf)
        }
        Value::UInt32(v) => {
            let mut buf = [0; 4];
            LittleEndian::write_u32(&mut buf, *v);
            to_words(&buf)
        }
        Value::Float32(v) => {
            let mut buf = [0; 4];
            LittleEndian::write_f32(&mut buf, *v);
            to_words(&buf)
        }
        Value::Int64(v) => {
            let mut buf = [0; 8];
            LittleEndian::write_i64(&mut buf, *v);
            to_words(&buf)
        }
        Value::UInt64(v) => {
            let mut buf = [0; 8];
            LittleEndian::write_u64(&mut buf, *v);
            to_words(&buf)
        }
        Value::Float64(v) => {
            let mut buf = [0; 8];
            LittleEndian::write_f64(&mut buf, *v);
            to_words(&buf)
        }
        Value::String(s) => {
            let mut buf = s.as_bytes().to_vec();
            if buf.len() % 2 != 0 {
                buf.push(0);
            }
            to_words(&buf)
        }
    }
}

fn to_bytes(words: &[Word]) -> Vec<u8> {
    let mut bytes = vec![0; words.len() * 2];
    LittleEndian::write_u16_into(words, &mut bytes);
    bytes
}

fn to_words(bytes: &[u8]) -> Vec<Word> {
    debug_assert_eq!(bytes.len() % 2, 0);
    let mut words = vec![0; bytes.len() / 2];
    LittleEndian::read_u16_into(bytes, &mut words);
    words
}

fn decode_string(words: &[Word]) -> String {
    let bytes = to_bytes(words);
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_int32_least_significant_word_first() {
        assert_eq!(
            decode(ScalarType::Int32, &[0x0002, 0x0000]).unwrap(),
            Value::Int32(2)
        );
        assert_eq!(
            decode(ScalarType::Int32, &[0x0000, 0x0002]).unwrap(),
            Value::Int32(131_072)
        );
        assert_eq!(
            decode(ScalarType::Int32, &[0xFFFE, 0xFFFF]).unwrap(),
            Value::Int32(-2)
        );
    }

    #[test]
    fn decode_uint32_like_int32_but_unsigned() {
        assert_eq!(
            decode(ScalarType::UInt32, &[0x0002, 0x0000]).unwrap(),
            Value::UInt32(2)
        );
        assert_eq!(
            decode(ScalarType::UInt32, &[0x0000, 0x0002]).unwrap(),
            Value::UInt32(0x0002_0000)
        );
        assert_eq!(
            decode(ScalarType::UInt32, &[0xFFFE, 0xFFFF]).unwrap(),
            Value::UInt32(0xFFFF_FFFE)
        );
    }

    #[test]
    fn decode_64_bit() {
        assert_eq!(
            decode(ScalarType::UInt64, &[0x4444, 0x3333, 0x2222, 0x1111]).unwrap(),
            Value::UInt64(0x1111_2222_3333_4444)
        );
        assert_eq!(
            decode(ScalarType::Int64, &[0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF]).unwrap(),
            Value::Int64(-1)
        );
    }

    #[test]
    fn decode_64_bit_needs_four_words() {
        assert_eq!(
            decode(ScalarType::Int64, &[1, 2, 3]),
            Err(DecodeError::Truncated {
                ty: ScalarType::Int64,
                expected: 4,
                actual: 3,
            })
        );
    }

    #[test]
    fn decode_single_register_types() {
        assert_eq!(decode(ScalarType::UInt16, &[0xBEEF]).unwrap(), Value::UInt16(0xBEEF));
        assert_eq!(decode(ScalarType::Int16, &[0xFFFB]).unwrap(), Value::Int16(-5));
        // The upper byte is not masked off
        assert_eq!(decode(ScalarType::UInt8, &[0x0123]).unwrap(), Value::UInt8(0x0123));
        assert_eq!(decode(ScalarType::Int8, &[0x00FF]).unwrap(), Value::Int8(0xFF));
    }

    #[test]
    fn decode_bool() {
        assert_eq!(decode(ScalarType::Bool, &[0]).unwrap(), Value::Bool(false));
        assert_eq!(decode(ScalarType::Bool, &[1]).unwrap(), Value::Bool(true));
        assert_eq!(decode(ScalarType::Bool, &[0x100]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn decode_floats() {
        // 1.5f32 = 0x3FC00000
        assert_eq!(
            decode(ScalarType::Float32, &[0x0000, 0x3FC0]).unwrap(),
            Value::Float32(1.5)
        );
        // -2.25f64 = 0xC002000000000000
        assert_eq!(
            decode(ScalarType::Float64, &[0, 0, 0, 0xC002]).unwrap(),
            Value::Float64(-2.25)
        );
    }

    #[test]
    fn decode_string_stops_at_nul() {
        assert_eq!(
            decode(ScalarType::String, &[0x4241, 0x0043]).unwrap(),
            Value::String("ABC".to_owned())
        );
        assert_eq!(
            decode(ScalarType::String, &[0x4241, 0x0043, 0x4544]).unwrap(),
            Value::String("ABC".to_owned())
        );
    }

    #[test]
    fn decode_string_without_nul() {
        assert_eq!(
            decode(ScalarType::String, &[0x4C45, 0x3133]).unwrap(),
            Value::String("EL31".to_owned())
        );
        assert_eq!(
            decode(ScalarType::String, &[]).unwrap(),
            Value::String(String::new())
        );
    }

    #[test]
    fn ignore_surplus_words() {
        assert_eq!(
            decode(ScalarType::UInt16, &[7, 0xFFFF]).unwrap(),
            Value::UInt16(7)
        );
    }

    #[test]
    fn encode_then_decode_every_type() {
        let values = [
            Value::Int8(-100),
            Value::UInt8(200),
            Value::Int16(i16::MIN),
            Value::UInt16(u16::MAX),
            Value::Int32(-123_456_789),
            Value::UInt32(4_000_000_000),
            Value::Int64(i64::MIN + 1),
            Value::UInt64(u64::MAX - 1),
            Value::Bool(true),
            Value::Bool(false),
            Value::Float32(-0.125),
            Value::Float64(std::f64::consts::PI),
            Value::String("EK9000".to_owned()),
            Value::String("EL3202-0010".to_owned()),
        ];
        for value in values {
            let words = encode(&value);
            if let Some(len) = value.scalar_type().payload_words() {
                assert_eq!(words.len(), len);
            }
            assert_eq!(decode(value.scalar_type(), &words).unwrap(), value);
        }
    }
}
