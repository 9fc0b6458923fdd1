//! Bounded-integer field kind.
//!
//! A value in `[min, max]` is encoded as the offset `value - min` in
//! `bits_in_range(min, max)` bits. Ranges wider than 32 bits are split into
//! 32-bit chunks, least significant first; no 128-bit wire arithmetic is
//! needed, only the offset widening below.

use std::marker::PhantomData;

use crate::buffer::{bits_to_represent, WordStorage};
use crate::codec::{ensure_read_capacity, ensure_write_capacity, FieldCodec};
use crate::error::{Result, SerializeError};
use crate::reader::BitReader;
use crate::writer::BitWriter;

mod sealed {
    pub trait Sealed {}
}

/// Primitive integers the bounded-integer kind can carry.
///
/// Sealed: implemented for `u8`-`u64` and `i8`-`i64`. The i128 widening
/// makes `value - min` well defined for every signed/unsigned combination.
pub trait WireInt: Copy + Eq + Ord + std::fmt::Debug + sealed::Sealed {
    #[doc(hidden)]
    fn to_wide(self) -> i128;
    #[doc(hidden)]
    fn from_wide(value: i128) -> Self;
}

macro_rules! wire_int {
    ($($ty:ty),+) => {$(
        impl sealed::Sealed for $ty {}

        impl WireInt for $ty {
            #[inline]
            fn to_wide(self) -> i128 {
                i128::from(self)
            }

            #[inline]
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            fn from_wide(value: i128) -> Self {
                value as $ty
            }
        }
    )+};
}

wire_int!(u8, u16, u32, u64, i8, i16, i32, i64);

/// Inclusive integer bounds, the runtime parameters of [`BoundedInt`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntRange<T: WireInt> {
    min: T,
    max: T,
}

impl<T: WireInt> IntRange<T> {
    /// Creates an inclusive range. Contract: `min < max` (debug-checked).
    #[must_use]
    pub fn new(min: T, max: T) -> Self {
        debug_assert!(min < max, "integer range requires min < max");
        Self { min, max }
    }

    /// Lower bound.
    #[must_use]
    pub fn min(&self) -> T {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub fn max(&self) -> T {
        self.max
    }

    /// Wire width of a value in this range.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn bits(&self) -> u32 {
        bits_to_represent((self.max.to_wide() - self.min.to_wide()) as u64)
    }

    fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Integer constrained to a runtime `[min, max]` range.
pub struct BoundedInt<T: WireInt>(PhantomData<T>);

impl<T: WireInt> FieldCodec for BoundedInt<T> {
    type Value = T;
    type Params = IntRange<T>;

    fn encode<S: WordStorage>(
        writer: &mut BitWriter<S>,
        value: &Self::Value,
        params: &Self::Params,
    ) -> Result<()> {
        if !params.contains(*value) {
            return Err(SerializeError::RangeViolation);
        }

        let num_bits = params.bits();
        ensure_write_capacity(writer, num_bits)?;

        #[allow(clippy::cast_sign_loss)]
        let offset = (value.to_wide() - params.min.to_wide()) as u64;

        let mut shift = 0;
        while shift < num_bits {
            let chunk = (num_bits - shift).min(32);
            #[allow(clippy::cast_possible_truncation)]
            let chunk_value = (offset >> shift) as u32;
            writer.serialize_bits(chunk_value, chunk)?;
            shift += chunk;
        }

        Ok(())
    }

    fn decode(reader: &mut BitReader<'_>, params: &Self::Params) -> Result<Self::Value> {
        let num_bits = params.bits();
        ensure_read_capacity(reader, num_bits)?;

        let mut offset = 0u64;
        let mut shift = 0;
        while shift < num_bits {
            let chunk = (num_bits - shift).min(32);
            offset |= u64::from(reader.serialize_bits(chunk)?) << shift;
            shift += chunk;
        }

        let wide = params.min.to_wide() + i128::from(offset);
        if wide > params.max.to_wide() {
            return Err(SerializeError::RangeViolation);
        }

        Ok(T::from_wide(wide))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::FixedBitWriter;
    use rand::{Rng, SeedableRng};

    fn round_trip<T: WireInt>(value: T, min: T, max: T) -> T {
        let mut backing = [0u32; 4];
        let range = IntRange::new(min, max);

        let mut writer = FixedBitWriter::from_words(&mut backing);
        writer.serialize::<BoundedInt<T>>(&value, &range).unwrap();
        let num_bits = writer.position_bits();
        writer.flush();
        drop(writer);

        let mut reader = BitReader::new(&backing, num_bits);
        reader.deserialize::<BoundedInt<T>>(&range).unwrap()
    }

    #[test]
    fn test_round_trip_all_widths() {
        assert_eq!(round_trip(98u8, 0, 127), 98);
        assert_eq!(round_trip(131u16, 0, 400), 131);
        assert_eq!(round_trip(-77i8, -100, 100), -77);
        assert_eq!(round_trip(-13_000i16, -20_000, 20_000), -13_000);
        assert_eq!(round_trip(1_000_000u32, 0, 2_000_000), 1_000_000);
        assert_eq!(round_trip(-5i64, -10, 10), -5);
    }

    #[test]
    fn test_bit_width_law() {
        // [0, 400] needs 9 bits on the wire.
        let range = IntRange::new(0u16, 400);
        assert_eq!(range.bits(), 9);

        let mut backing = [0u32; 2];
        let mut writer = FixedBitWriter::from_words(&mut backing);
        writer.serialize::<BoundedInt<u16>>(&131, &range).unwrap();
        assert_eq!(writer.position_bits(), 9);
    }

    #[test]
    fn test_range_wider_than_one_word() {
        let range = IntRange::new(0u64, u64::MAX);
        assert_eq!(range.bits(), 64);

        assert_eq!(
            round_trip(0xDEAD_BEEF_CAFE_F00Du64, 0, u64::MAX),
            0xDEAD_BEEF_CAFE_F00D
        );
        assert_eq!(
            round_trip(-4_000_000_000_000i64, i64::MIN, i64::MAX),
            -4_000_000_000_000
        );
    }

    #[test]
    fn test_range_straddling_signedness() {
        assert_eq!(round_trip(-1i32, -5, 5), -1);
        assert_eq!(round_trip(5i32, -5, 5), 5);
        assert_eq!(round_trip(-5i32, -5, 5), -5);
    }

    #[test]
    fn test_out_of_range_rejected_before_write() {
        let range = IntRange::new(10u32, 20);
        let mut backing = [0u32; 2];
        let mut writer = FixedBitWriter::from_words(&mut backing);

        let err = writer.serialize::<BoundedInt<u32>>(&21, &range).unwrap_err();
        assert_eq!(err, SerializeError::RangeViolation);
        // Nothing was committed.
        assert_eq!(writer.position_bits(), 0);
    }

    #[test]
    fn test_decoded_offset_past_max_rejected() {
        // [0, 5] takes 3 bits; 7 is encodable in the width but out of range.
        let mut backing = [0u32; 1];
        let mut writer = FixedBitWriter::from_words(&mut backing);
        writer.serialize_bits(7, 3).unwrap();
        writer.flush();
        drop(writer);

        let mut reader = BitReader::new(&backing, 3);
        let err = reader
            .deserialize::<BoundedInt<u32>>(&IntRange::new(0, 5))
            .unwrap_err();
        assert_eq!(err, SerializeError::RangeViolation);
    }

    #[test]
    fn test_random_round_trips() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0xB175);

        for _ in 0..500 {
            let a: i64 = rng.gen();
            let b: i64 = rng.gen();
            let (min, max) = if a < b { (a, b) } else if a > b { (b, a) } else { continue };
            let value = rng.gen_range(min..=max);
            assert_eq!(round_trip(value, min, max), value);
        }
    }
}
