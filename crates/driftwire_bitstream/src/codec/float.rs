//! Float field kinds: raw passthrough, half precision, bounded range.

use driftwire_quant::{half, BoundedRange};

use crate::buffer::WordStorage;
use crate::codec::{ensure_write_capacity, FieldCodec};
use crate::error::Result;
use crate::reader::BitReader;
use crate::writer::BitWriter;

/// `f32` serialized as its raw 32-bit pattern, no quantization.
pub struct Float32;

impl FieldCodec for Float32 {
    type Value = f32;
    type Params = ();

    fn encode<S: WordStorage>(
        writer: &mut BitWriter<S>,
        value: &Self::Value,
        (): &Self::Params,
    ) -> Result<()> {
        writer.serialize_bits(value.to_bits(), 32)
    }

    fn decode(reader: &mut BitReader<'_>, (): &Self::Params) -> Result<Self::Value> {
        Ok(f32::from_bits(reader.serialize_bits(32)?))
    }
}

/// `f64` serialized as its raw 64-bit pattern, low word first.
pub struct Float64;

impl FieldCodec for Float64 {
    type Value = f64;
    type Params = ();

    fn encode<S: WordStorage>(
        writer: &mut BitWriter<S>,
        value: &Self::Value,
        (): &Self::Params,
    ) -> Result<()> {
        ensure_write_capacity(writer, 64)?;

        let bits = value.to_bits();
        #[allow(clippy::cast_possible_truncation)]
        writer.serialize_bits(bits as u32, 32)?;
        #[allow(clippy::cast_possible_truncation)]
        writer.serialize_bits((bits >> 32) as u32, 32)?;
        Ok(())
    }

    fn decode(reader: &mut BitReader<'_>, (): &Self::Params) -> Result<Self::Value> {
        let low = u64::from(reader.serialize_bits(32)?);
        let high = u64::from(reader.serialize_bits(32)?);
        Ok(f64::from_bits(low | (high << 32)))
    }
}

/// `f32` compressed to 16 bits of half precision.
pub struct HalfFloat;

impl FieldCodec for HalfFloat {
    type Value = f32;
    type Params = ();

    fn encode<S: WordStorage>(
        writer: &mut BitWriter<S>,
        value: &Self::Value,
        (): &Self::Params,
    ) -> Result<()> {
        writer.serialize_bits(u32::from(half::quantize(*value)), 16)
    }

    fn decode(reader: &mut BitReader<'_>, (): &Self::Params) -> Result<Self::Value> {
        #[allow(clippy::cast_possible_truncation)]
        let packed = reader.serialize_bits(16)? as u16;
        Ok(half::dequantize(packed))
    }
}

/// `f32` quantized into a [`BoundedRange`]'s fixed-point domain.
///
/// Inputs are clamped to the range, so encoding never fails on the value;
/// lossiness is bounded by the range's precision.
pub struct RangedFloat;

impl FieldCodec for RangedFloat {
    type Value = f32;
    type Params = BoundedRange;

    fn encode<S: WordStorage>(
        writer: &mut BitWriter<S>,
        value: &Self::Value,
        params: &Self::Params,
    ) -> Result<()> {
        writer.serialize_bits(params.quantize(*value), params.bits_required())
    }

    fn decode(reader: &mut BitReader<'_>, params: &Self::Params) -> Result<Self::Value> {
        let quantized = reader.serialize_bits(params.bits_required())?;
        Ok(params.dequantize(quantized))
    }
}
