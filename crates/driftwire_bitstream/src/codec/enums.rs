//! Enum field kind.
//!
//! An enum is just a bounded integer with a mapping back into the variant
//! set; the wire cost is identical to `BoundedInt` over `[MIN, MAX]`.

use std::marker::PhantomData;

use crate::buffer::WordStorage;
use crate::codec::{BoundedInt, FieldCodec, IntRange};
use crate::error::{Result, SerializeError};
use crate::reader::BitReader;
use crate::writer::BitWriter;

/// Conversion between an enum and its wire discriminant.
///
/// `MIN`/`MAX` bound the discriminant domain; `from_raw` returning `None`
/// marks a discriminant with no matching variant (a hole in the range) and
/// decodes as a range violation.
pub trait WireEnum: Copy {
    /// Smallest discriminant on the wire.
    const MIN: u32;
    /// Largest discriminant on the wire.
    const MAX: u32;

    /// The discriminant this variant serializes as.
    fn to_raw(self) -> u32;

    /// Maps a discriminant back to a variant.
    fn from_raw(raw: u32) -> Option<Self>;
}

/// Enum serialized as its bounded discriminant.
pub struct EnumField<E: WireEnum>(PhantomData<E>);

impl<E: WireEnum> FieldCodec for EnumField<E> {
    type Value = E;
    type Params = ();

    fn encode<S: WordStorage>(
        writer: &mut BitWriter<S>,
        value: &Self::Value,
        (): &Self::Params,
    ) -> Result<()> {
        let raw = value.to_raw();
        BoundedInt::<u32>::encode(writer, &raw, &IntRange::new(E::MIN, E::MAX))
    }

    fn decode(reader: &mut BitReader<'_>, (): &Self::Params) -> Result<Self::Value> {
        let raw = BoundedInt::<u32>::decode(reader, &IntRange::new(E::MIN, E::MAX))?;
        E::from_raw(raw).ok_or(SerializeError::RangeViolation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::FixedBitWriter;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Stance {
        Standing,
        Crouching,
        Prone,
        Swimming,
        Climbing,
    }

    impl WireEnum for Stance {
        const MIN: u32 = 0;
        const MAX: u32 = 4;

        fn to_raw(self) -> u32 {
            self as u32
        }

        fn from_raw(raw: u32) -> Option<Self> {
            match raw {
                0 => Some(Self::Standing),
                1 => Some(Self::Crouching),
                2 => Some(Self::Prone),
                3 => Some(Self::Swimming),
                4 => Some(Self::Climbing),
                _ => None,
            }
        }
    }

    #[test]
    fn test_enum_round_trip_uses_discriminant_width() {
        let mut backing = [0u32; 1];
        let mut writer = FixedBitWriter::from_words(&mut backing);
        writer.serialize::<EnumField<Stance>>(&Stance::Prone, &()).unwrap();

        // [0, 4] takes 3 bits.
        assert_eq!(writer.position_bits(), 3);
        let num_bits = writer.position_bits();
        writer.flush();
        drop(writer);

        let mut reader = BitReader::new(&backing, num_bits);
        assert_eq!(
            reader.deserialize::<EnumField<Stance>>(&()).unwrap(),
            Stance::Prone
        );
    }

    #[test]
    fn test_unmapped_discriminant_is_a_range_violation() {
        // 5 fits in 3 bits but names no variant.
        let mut backing = [0u32; 1];
        let mut writer = FixedBitWriter::from_words(&mut backing);
        writer.serialize_bits(5, 3).unwrap();
        writer.flush();
        drop(writer);

        let mut reader = BitReader::new(&backing, 3);
        let err = reader.deserialize::<EnumField<Stance>>(&()).unwrap_err();
        assert_eq!(err, SerializeError::RangeViolation);
    }
}
