//! Field-kind codec dispatch.
//!
//! A field kind is a zero-sized marker type implementing [`FieldCodec`]; it
//! statically selects one encode and one decode algorithm sharing the same
//! cursor engine. Resolution happens entirely at compile time - there is no
//! registry, no vtable, no runtime lookup. Runtime parameters (bounds,
//! precision, max lengths) travel through the kind's `Params` type.
//!
//! For every kind, decoding what encode wrote yields the original value
//! exactly, for all values in the kind's declared domain; out-of-domain
//! values are rejected before any bits are committed.

use crate::buffer::WordStorage;
use crate::error::{Result, SerializeError};
use crate::reader::BitReader;
use crate::writer::BitWriter;

pub mod enums;
pub mod flag;
pub mod float;
pub mod integer;
pub mod multi;
pub mod quat;
pub mod string;

pub use enums::{EnumField, WireEnum};
pub use flag::Flag;
pub use float::{Float32, Float64, HalfFloat, RangedFloat};
pub use integer::{BoundedInt, IntRange, WireInt};
pub use quat::QuatSmallestThree;
pub use string::{BoundedBytes, BoundedString};

/// A statically-dispatched (encode, decode) pair for one logical field kind.
pub trait FieldCodec {
    /// The in-memory value this kind serializes.
    type Value;
    /// Runtime parameters (bounds, precision, max length). `()` when the
    /// kind needs none.
    type Params;

    /// Encodes `value` into the writer.
    ///
    /// Must reject out-of-domain values with
    /// [`SerializeError::RangeViolation`] before committing any bits.
    fn encode<S: WordStorage>(
        writer: &mut BitWriter<S>,
        value: &Self::Value,
        params: &Self::Params,
    ) -> Result<()>;

    /// Decodes a value the matching `encode` produced.
    fn decode(reader: &mut BitReader<'_>, params: &Self::Params) -> Result<Self::Value>;
}

impl<S: WordStorage> BitWriter<S> {
    /// Encodes `value` under field kind `K`.
    pub fn serialize<K: FieldCodec>(&mut self, value: &K::Value, params: &K::Params) -> Result<()> {
        K::encode(self, value, params)
    }
}

impl BitReader<'_> {
    /// Decodes a value of field kind `K`.
    pub fn deserialize<K: FieldCodec>(&mut self, params: &K::Params) -> Result<K::Value> {
        K::decode(self, params)
    }
}

/// Pre-checks capacity for a multi-call field so nothing is partially
/// written when the buffer is too small.
pub(crate) fn ensure_write_capacity<S: WordStorage>(
    writer: &BitWriter<S>,
    num_bits: u32,
) -> Result<()> {
    if writer.can_serialize_bits(num_bits) {
        Ok(())
    } else {
        Err(SerializeError::CapacityExceeded {
            requested: num_bits,
            remaining: writer.remaining_bits(),
        })
    }
}

/// Read-side counterpart of [`ensure_write_capacity`].
pub(crate) fn ensure_read_capacity(reader: &BitReader<'_>, num_bits: u32) -> Result<()> {
    if reader.can_serialize_bits(num_bits) {
        Ok(())
    } else {
        Err(SerializeError::CapacityExceeded {
            requested: num_bits,
            remaining: reader.remaining_bits(),
        })
    }
}
