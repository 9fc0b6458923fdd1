//! Tiered-delta sparse array codec.
//!
//! Encodes the elements of a fixed-size slice that satisfy a predicate,
//! each as an implicit index (delta from the previous included index) plus
//! the element value under its own field kind. Index deltas use escalating
//! bit-width tiers, each guarded by a one-bit flag in fixed order, so dense
//! selections cost one bit per step and sparse ones grow gracefully. A
//! final delta landing exactly on `max_size` terminates the sequence.
//!
//! The tier boundaries are an empirical tuning preserved verbatim for wire
//! compatibility.

use crate::buffer::WordStorage;
use crate::codec::{BoundedInt, FieldCodec, Flag, IntRange};
use crate::error::{Result, SerializeError};
use crate::reader::BitReader;
use crate::writer::BitWriter;

/// Flag-guarded delta tiers: `(min, max)` inclusive. Deltas of 1 are flag
/// only; deltas past the last tier fall through to a bounded integer.
const DELTA_TIERS: [(u32, u32); 5] = [(2, 5), (6, 13), (14, 29), (30, 61), (62, 125)];

/// Encodes the elements of `values` for which `include` returns `true`.
///
/// Indices are implicit (delta-encoded in ascending order); each included
/// element's value follows its index under kind `K`. The decoder must use
/// the same `max_size`, kind, and params.
pub fn write_subset<K, S, F>(
    writer: &mut BitWriter<S>,
    values: &[K::Value],
    params: &K::Params,
    mut include: F,
) -> Result<()>
where
    K: FieldCodec,
    S: WordStorage,
    F: FnMut(&K::Value) -> bool,
{
    let max_size = slice_size(values)?;

    let mut previous: i64 = -1;
    for (index, value) in values.iter().enumerate() {
        if !include(value) {
            continue;
        }

        #[allow(clippy::cast_possible_truncation)]
        write_index_delta(writer, &mut previous, index as u32, max_size)?;
        K::encode(writer, value, params)?;
    }

    // Sentinel: a delta landing exactly on max_size ends the sequence.
    write_index_delta(writer, &mut previous, max_size, max_size)
}

/// Decodes a subset produced by [`write_subset`] into `values`.
///
/// Only included indices are assigned; the rest keep their existing
/// contents. Any failed primitive read aborts immediately.
pub fn read_subset<K>(
    reader: &mut BitReader<'_>,
    values: &mut [K::Value],
    params: &K::Params,
) -> Result<()>
where
    K: FieldCodec,
{
    let max_size = slice_size(values)?;

    let mut previous: i64 = -1;
    loop {
        let index = read_index_delta(reader, &mut previous, max_size)?;
        if index == max_size {
            return Ok(());
        }
        values[index as usize] = K::decode(reader, params)?;
    }
}

fn slice_size<T>(values: &[T]) -> Result<u32> {
    u32::try_from(values.len()).map_err(|_| SerializeError::RangeViolation)
}

/// Fallback bounds for deltas past the last tier. The upper bound is
/// `max_size + 1` because the terminating sentinel can be one past the
/// largest in-range index delta (an empty subset jumps from -1 to
/// `max_size`); the `max(126)` keeps the range well formed at the boundary
/// where the fallback first becomes reachable.
fn fallback_range(max_size: u32) -> IntRange<u32> {
    IntRange::new(126, max_size.max(126) + 1)
}

fn write_index_delta<S: WordStorage>(
    writer: &mut BitWriter<S>,
    previous: &mut i64,
    current: u32,
    max_size: u32,
) -> Result<()> {
    let delta_wide = i64::from(current) - *previous;
    debug_assert!(delta_wide >= 1, "subset indices must be strictly ascending");
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let delta = delta_wide as u32;

    // Consecutive index: flag only.
    writer.serialize::<Flag>(&(delta == 1), &())?;
    if delta == 1 {
        *previous = i64::from(current);
        return Ok(());
    }

    for (tier_min, tier_max) in DELTA_TIERS {
        let hit = delta <= tier_max;
        writer.serialize::<Flag>(&hit, &())?;
        if hit {
            writer.serialize::<BoundedInt<u32>>(&delta, &IntRange::new(tier_min, tier_max))?;
            *previous = i64::from(current);
            return Ok(());
        }
    }

    writer.serialize::<BoundedInt<u32>>(&delta, &fallback_range(max_size))?;
    *previous = i64::from(current);
    Ok(())
}

fn read_index_delta(
    reader: &mut BitReader<'_>,
    previous: &mut i64,
    max_size: u32,
) -> Result<u32> {
    let delta = if reader.deserialize::<Flag>(&())? {
        1
    } else {
        let mut tiered = None;
        for (tier_min, tier_max) in DELTA_TIERS {
            if reader.deserialize::<Flag>(&())? {
                tiered =
                    Some(reader.deserialize::<BoundedInt<u32>>(&IntRange::new(tier_min, tier_max))?);
                break;
            }
        }
        match tiered {
            Some(delta) => delta,
            None => reader.deserialize::<BoundedInt<u32>>(&fallback_range(max_size))?,
        }
    };

    let current = *previous + i64::from(delta);
    if current > i64::from(max_size) {
        // A forged delta pointing past the collection.
        return Err(SerializeError::RangeViolation);
    }

    *previous = current;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(current as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::BoundedInt;
    use crate::writer::FixedBitWriter;

    type Element = BoundedInt<u32>;

    fn element_range() -> IntRange<u32> {
        IntRange::new(0, 2048)
    }

    #[test]
    fn test_subset_scenario() {
        let values_in: [u32; 6] = [10, 21, 42, 99, 420, 1337];
        let include = |value: &u32| *value != 21 && *value != 42 && *value != 99;

        let mut backing = [0u32; 4];
        let mut writer = FixedBitWriter::from_words(&mut backing);
        write_subset::<Element, _, _>(&mut writer, &values_in, &element_range(), include)
            .unwrap();
        let num_bits = writer.position_bits();
        let num_bytes = writer.flush();
        drop(writer);

        assert_eq!(num_bytes, 6);

        let mut values_out = [0u32; 6];
        let mut reader = BitReader::new(&backing, num_bits);
        read_subset::<Element>(&mut reader, &mut values_out, &element_range()).unwrap();

        assert_eq!(values_out, [10, 0, 0, 0, 420, 1337]);
    }

    #[test]
    fn test_empty_subset_is_just_the_sentinel() {
        let values_in: [u32; 6] = [1, 2, 3, 4, 5, 6];

        let mut backing = [0u32; 2];
        let mut writer = FixedBitWriter::from_words(&mut backing);
        write_subset::<Element, _, _>(&mut writer, &values_in, &element_range(), |_| false)
            .unwrap();
        let num_bits = writer.position_bits();
        writer.flush();
        drop(writer);

        let mut values_out = [0u32; 6];
        let mut reader = BitReader::new(&backing, num_bits);
        read_subset::<Element>(&mut reader, &mut values_out, &element_range()).unwrap();

        assert_eq!(values_out, [0u32; 6]);
    }

    #[test]
    fn test_full_subset_costs_one_flag_per_index() {
        let values_in: [u32; 8] = [7; 8];

        let mut backing = [0u32; 8];
        let mut writer = FixedBitWriter::from_words(&mut backing);
        write_subset::<Element, _, _>(&mut writer, &values_in, &element_range(), |_| true)
            .unwrap();

        // 8 consecutive indices at 1 flag + 12 value bits each, plus the
        // sentinel delta of 1.
        assert_eq!(writer.position_bits(), 8 * (1 + 12) + 1);
        let num_bits = writer.position_bits();
        writer.flush();
        drop(writer);

        let mut values_out = [0u32; 8];
        let mut reader = BitReader::new(&backing, num_bits);
        read_subset::<Element>(&mut reader, &mut values_out, &element_range()).unwrap();
        assert_eq!(values_out, values_in);
    }

    #[test]
    fn test_sparse_subset_with_large_gaps() {
        let mut values_in = vec![0u32; 300];
        values_in[0] = 100;
        values_in[150] = 200;
        values_in[299] = 300;
        let include = |value: &u32| *value != 0;

        let mut backing = [0u32; 16];
        let mut writer = FixedBitWriter::from_words(&mut backing);
        write_subset::<Element, _, _>(&mut writer, &values_in, &element_range(), include)
            .unwrap();
        let num_bits = writer.position_bits();
        writer.flush();
        drop(writer);

        let mut values_out = vec![0u32; 300];
        let mut reader = BitReader::new(&backing, num_bits);
        read_subset::<Element>(&mut reader, &mut values_out, &element_range()).unwrap();

        assert_eq!(values_out[0], 100);
        assert_eq!(values_out[150], 200);
        assert_eq!(values_out[299], 300);
        assert_eq!(values_out.iter().filter(|v| **v != 0).count(), 3);
    }

    #[test]
    fn test_truncated_stream_aborts_decoding() {
        let values_in: [u32; 6] = [10, 21, 42, 99, 420, 1337];

        let mut backing = [0u32; 4];
        let mut writer = FixedBitWriter::from_words(&mut backing);
        write_subset::<Element, _, _>(&mut writer, &values_in, &element_range(), |_| true)
            .unwrap();
        let num_bits = writer.position_bits();
        writer.flush();
        drop(writer);

        let mut values_out = [0u32; 6];
        // Half the bits: the decoder must fail, not invent structure.
        let mut reader = BitReader::new(&backing, num_bits / 2);
        let err =
            read_subset::<Element>(&mut reader, &mut values_out, &element_range()).unwrap_err();
        assert!(matches!(err, SerializeError::CapacityExceeded { .. }));
    }
}
