//! Length-prefixed byte and string field kinds.
//!
//! The length travels first, in `bits_to_represent(max_len)` bits, followed
//! by the raw bytes. The length prefix's width depends only on the declared
//! maximum, so both sides must agree on it.

use crate::buffer::{bits_to_represent, WordStorage};
use crate::codec::{ensure_read_capacity, ensure_write_capacity, FieldCodec};
use crate::error::{Result, SerializeError};
use crate::reader::BitReader;
use crate::writer::BitWriter;

/// Byte vector with a declared maximum length (the kind's parameter).
pub struct BoundedBytes;

impl FieldCodec for BoundedBytes {
    type Value = Vec<u8>;
    type Params = u32;

    fn encode<S: WordStorage>(
        writer: &mut BitWriter<S>,
        value: &Self::Value,
        max_len: &Self::Params,
    ) -> Result<()> {
        encode_bytes(writer, value, *max_len)
    }

    fn decode(reader: &mut BitReader<'_>, max_len: &Self::Params) -> Result<Self::Value> {
        decode_bytes(reader, *max_len)
    }
}

/// UTF-8 string with a declared maximum byte length (the kind's parameter).
///
/// Decoded bytes that are not valid UTF-8 are outside the kind's domain and
/// fail with [`SerializeError::RangeViolation`].
pub struct BoundedString;

impl FieldCodec for BoundedString {
    type Value = String;
    type Params = u32;

    fn encode<S: WordStorage>(
        writer: &mut BitWriter<S>,
        value: &Self::Value,
        max_len: &Self::Params,
    ) -> Result<()> {
        encode_bytes(writer, value.as_bytes(), *max_len)
    }

    fn decode(reader: &mut BitReader<'_>, max_len: &Self::Params) -> Result<Self::Value> {
        let bytes = decode_bytes(reader, *max_len)?;
        String::from_utf8(bytes).map_err(|_| SerializeError::RangeViolation)
    }
}

fn encode_bytes<S: WordStorage>(writer: &mut BitWriter<S>, bytes: &[u8], max_len: u32) -> Result<()> {
    debug_assert!(max_len > 0, "maximum length must be positive");

    let length = u32::try_from(bytes.len()).map_err(|_| SerializeError::RangeViolation)?;
    if length > max_len {
        return Err(SerializeError::RangeViolation);
    }

    let prefix_bits = bits_to_represent(u64::from(max_len));
    let payload_bits = length
        .checked_mul(8)
        .ok_or(SerializeError::RangeViolation)?;
    ensure_write_capacity(writer, prefix_bits + payload_bits)?;

    writer.serialize_bits(length, prefix_bits)?;
    if length > 0 {
        writer.serialize_bytes(bytes, payload_bits)?;
    }

    Ok(())
}

fn decode_bytes(reader: &mut BitReader<'_>, max_len: u32) -> Result<Vec<u8>> {
    debug_assert!(max_len > 0, "maximum length must be positive");

    let prefix_bits = bits_to_represent(u64::from(max_len));
    ensure_read_capacity(reader, prefix_bits)?;

    let length = reader.serialize_bits(prefix_bits)?;
    if length > max_len {
        return Err(SerializeError::RangeViolation);
    }

    let payload_bits = length
        .checked_mul(8)
        .ok_or(SerializeError::RangeViolation)?;
    ensure_read_capacity(reader, payload_bits)?;

    let mut bytes = vec![0u8; length as usize];
    if length > 0 {
        reader.serialize_bytes(&mut bytes, payload_bits)?;
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::FixedBitWriter;

    #[test]
    fn test_string_round_trip() {
        let value = String::from("hello, wire");

        let mut backing = [0u32; 16];
        let mut writer = FixedBitWriter::from_words(&mut backing);
        writer.serialize::<BoundedString>(&value, &32).unwrap();

        // 6-bit length prefix plus 11 bytes.
        assert_eq!(writer.position_bits(), 6 + 88);
        let num_bits = writer.position_bits();
        writer.flush();
        drop(writer);

        let mut reader = BitReader::new(&backing, num_bits);
        assert_eq!(reader.deserialize::<BoundedString>(&32).unwrap(), value);
    }

    #[test]
    fn test_empty_string_is_just_the_prefix() {
        let mut backing = [0u32; 1];
        let mut writer = FixedBitWriter::from_words(&mut backing);
        writer.serialize::<BoundedString>(&String::new(), &32).unwrap();
        assert_eq!(writer.position_bits(), 6);
        let num_bits = writer.position_bits();
        writer.flush();
        drop(writer);

        let mut reader = BitReader::new(&backing, num_bits);
        assert_eq!(reader.deserialize::<BoundedString>(&32).unwrap(), "");
    }

    #[test]
    fn test_over_long_value_rejected_before_write() {
        let value = vec![0xAA; 40];

        let mut backing = [0u32; 16];
        let mut writer = FixedBitWriter::from_words(&mut backing);
        let err = writer.serialize::<BoundedBytes>(&value, &32).unwrap_err();
        assert_eq!(err, SerializeError::RangeViolation);
        assert_eq!(writer.position_bits(), 0);
    }

    #[test]
    fn test_max_length_value_is_accepted() {
        let value = vec![0x5A; 32];

        let mut backing = [0u32; 16];
        let mut writer = FixedBitWriter::from_words(&mut backing);
        writer.serialize::<BoundedBytes>(&value, &32).unwrap();
        let num_bits = writer.position_bits();
        writer.flush();
        drop(writer);

        let mut reader = BitReader::new(&backing, num_bits);
        assert_eq!(reader.deserialize::<BoundedBytes>(&32).unwrap(), value);
    }

    #[test]
    fn test_decoded_length_above_max_rejected() {
        // Forge a length prefix of 40 against a declared max of 32.
        let mut backing = [0u32; 16];
        let mut writer = FixedBitWriter::from_words(&mut backing);
        writer.serialize_bits(40, 6).unwrap();
        writer.flush();
        drop(writer);

        let mut reader = BitReader::from_words(&backing);
        let err = reader.deserialize::<BoundedBytes>(&32).unwrap_err();
        assert_eq!(err, SerializeError::RangeViolation);
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let value = vec![0xFF, 0xFE, 0xFD];

        let mut backing = [0u32; 4];
        let mut writer = FixedBitWriter::from_words(&mut backing);
        writer.serialize::<BoundedBytes>(&value, &8).unwrap();
        let num_bits = writer.position_bits();
        writer.flush();
        drop(writer);

        let mut reader = BitReader::new(&backing, num_bits);
        let err = reader.deserialize::<BoundedString>(&8).unwrap_err();
        assert_eq!(err, SerializeError::RangeViolation);
    }
}
