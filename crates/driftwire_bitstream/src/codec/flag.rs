//! Single-bit boolean field kind.

use crate::buffer::WordStorage;
use crate::codec::FieldCodec;
use crate::error::Result;
use crate::reader::BitReader;
use crate::writer::BitWriter;

/// A boolean serialized as one raw bit.
pub struct Flag;

impl FieldCodec for Flag {
    type Value = bool;
    type Params = ();

    fn encode<S: WordStorage>(
        writer: &mut BitWriter<S>,
        value: &Self::Value,
        (): &Self::Params,
    ) -> Result<()> {
        writer.serialize_bits(u32::from(*value), 1)
    }

    fn decode(reader: &mut BitReader<'_>, (): &Self::Params) -> Result<Self::Value> {
        Ok(reader.serialize_bits(1)? != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::FixedBitWriter;

    #[test]
    fn test_flag_round_trip() {
        let mut backing = [0u32; 1];
        let mut writer = FixedBitWriter::from_words(&mut backing);
        writer.serialize::<Flag>(&true, &()).unwrap();
        writer.serialize::<Flag>(&false, &()).unwrap();
        writer.serialize::<Flag>(&true, &()).unwrap();
        let num_bits = writer.position_bits();
        writer.flush();
        drop(writer);

        assert_eq!(num_bits, 3);

        let mut reader = BitReader::new(&backing, num_bits);
        assert!(reader.deserialize::<Flag>(&()).unwrap());
        assert!(!reader.deserialize::<Flag>(&()).unwrap());
        assert!(reader.deserialize::<Flag>(&()).unwrap());
    }
}
