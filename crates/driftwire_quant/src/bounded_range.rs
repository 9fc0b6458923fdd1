//! Bounded-range float quantization.
//!
//! Maps a float in `[min, max]` to an unsigned fixed-point integer with a
//! caller-chosen precision. The integer bit width is derived once at
//! construction, so a single [`BoundedRange`] can be reused for every field
//! that shares its bounds.

use serde::{Deserialize, Serialize};

/// Fixed-point quantization scheme over a closed float range.
///
/// Immutable after construction. `bits_required` is
/// `ceil(log2((max - min) / precision + 1))`, i.e. the bit length of the
/// largest quantized value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundedRange {
    min: f32,
    max: f32,
    precision: f32,
    bits_required: u32,
    mask: u32,
}

impl BoundedRange {
    /// Creates a quantization scheme for `[min, max]` with the given step.
    ///
    /// Contract: `min < max` and `precision > 0`. Violations are programmer
    /// errors, checked in debug builds only.
    #[must_use]
    pub fn new(min: f32, max: f32, precision: f32) -> Self {
        debug_assert!(min < max, "bounded range requires min < max");
        debug_assert!(precision > 0.0, "bounded range requires positive precision");

        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let steps = ((max - min) * (1.0 / precision) + 0.5) as u32;
        let bits_required = bit_length(steps);
        let mask = if bits_required >= 32 {
            u32::MAX
        } else {
            (1u32 << bits_required) - 1
        };

        Self {
            min,
            max,
            precision,
            bits_required,
            mask,
        }
    }

    /// Lower bound of the quantized domain.
    #[must_use]
    pub const fn min(&self) -> f32 {
        self.min
    }

    /// Upper bound of the quantized domain.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Quantization step.
    #[must_use]
    pub const fn precision(&self) -> f32 {
        self.precision
    }

    /// Number of bits a quantized value occupies on the wire.
    #[must_use]
    pub const fn bits_required(&self) -> u32 {
        self.bits_required
    }

    /// Quantizes a float into `bits_required` bits.
    ///
    /// Values outside `[min, max]` are clamped first, so quantization never
    /// fails; lossiness is bounded by `precision` inside the domain.
    #[must_use]
    pub fn quantize(&self, value: f32) -> u32 {
        let clamped = value.clamp(self.min, self.max);

        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let quantized = ((clamped - self.min) * (1.0 / self.precision) + 0.5) as u32;
        quantized & self.mask
    }

    /// Reconstructs the float a quantized value represents.
    #[must_use]
    pub fn dequantize(&self, data: u32) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let adjusted = (data as f32) * self.precision + self.min;
        adjusted.clamp(self.min, self.max)
    }
}

/// Number of bits needed to represent `value`, i.e. `ceil(log2(value + 1))`.
#[must_use]
pub(crate) const fn bit_length(value: u32) -> u32 {
    32 - value.leading_zeros()
}
