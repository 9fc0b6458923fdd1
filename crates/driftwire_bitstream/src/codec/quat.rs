//! Smallest-three quaternion field kind.

use driftwire_quant::{QuantizedQuaternion, Quaternion, SmallestThree};

use crate::buffer::WordStorage;
use crate::codec::{ensure_read_capacity, ensure_write_capacity, FieldCodec};
use crate::error::Result;
use crate::reader::BitReader;
use crate::writer::BitWriter;

/// Unit quaternion compressed with the smallest-three scheme.
///
/// Wire cost: `2 + 3 * BITS_PER_ELEMENT` bits. 11 bits per element keeps
/// the decoded rotation within a `1e-5` dot-product error of the input.
pub struct QuatSmallestThree<const BITS_PER_ELEMENT: u32 = 12>;

impl<const BITS_PER_ELEMENT: u32> QuatSmallestThree<BITS_PER_ELEMENT> {
    /// Total wire bits for one quaternion.
    #[must_use]
    pub const fn wire_bits() -> u32 {
        2 + 3 * BITS_PER_ELEMENT
    }
}

impl<const BITS_PER_ELEMENT: u32> FieldCodec for QuatSmallestThree<BITS_PER_ELEMENT> {
    type Value = Quaternion;
    type Params = ();

    fn encode<S: WordStorage>(
        writer: &mut BitWriter<S>,
        value: &Self::Value,
        (): &Self::Params,
    ) -> Result<()> {
        debug_assert!(
            BITS_PER_ELEMENT >= 2 && BITS_PER_ELEMENT <= 30,
            "bits per element must be in [2, 30]"
        );
        ensure_write_capacity(writer, Self::wire_bits())?;

        let quantized = SmallestThree::<BITS_PER_ELEMENT>::quantize(value);

        writer.serialize_bits(quantized.largest, 2)?;
        writer.serialize_bits(quantized.a, BITS_PER_ELEMENT)?;
        writer.serialize_bits(quantized.b, BITS_PER_ELEMENT)?;
        writer.serialize_bits(quantized.c, BITS_PER_ELEMENT)?;

        Ok(())
    }

    fn decode(reader: &mut BitReader<'_>, (): &Self::Params) -> Result<Self::Value> {
        ensure_read_capacity(reader, Self::wire_bits())?;

        let quantized = QuantizedQuaternion {
            largest: reader.serialize_bits(2)?,
            a: reader.serialize_bits(BITS_PER_ELEMENT)?,
            b: reader.serialize_bits(BITS_PER_ELEMENT)?,
            c: reader.serialize_bits(BITS_PER_ELEMENT)?,
        };

        Ok(SmallestThree::<BITS_PER_ELEMENT>::dequantize(&quantized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::FixedBitWriter;

    #[test]
    fn test_round_trip_fidelity_at_11_bits() {
        let quat_in = Quaternion::new(0.0, 2.0f32.sin(), 2.0f32.cos(), 0.0);

        let mut backing = [0u32; 2];
        let mut writer = FixedBitWriter::from_words(&mut backing);
        writer.serialize::<QuatSmallestThree<11>>(&quat_in, &()).unwrap();
        assert_eq!(writer.position_bits(), 35);
        let num_bits = writer.position_bits();
        writer.flush();
        drop(writer);

        let mut reader = BitReader::new(&backing, num_bits);
        let quat_out = reader.deserialize::<QuatSmallestThree<11>>(&()).unwrap();

        assert!(quat_in.dot(quat_out).abs() >= 1.0 - 1e-5);
    }

    #[test]
    fn test_identity_round_trip() {
        let mut backing = [0u32; 2];
        let mut writer = FixedBitWriter::from_words(&mut backing);
        writer
            .serialize::<QuatSmallestThree<12>>(&Quaternion::IDENTITY, &())
            .unwrap();
        let num_bits = writer.position_bits();
        writer.flush();
        drop(writer);

        let mut reader = BitReader::new(&backing, num_bits);
        let quat_out = reader.deserialize::<QuatSmallestThree<12>>(&()).unwrap();

        assert!(Quaternion::IDENTITY.dot(quat_out).abs() >= 1.0 - 1e-5);
    }
}
