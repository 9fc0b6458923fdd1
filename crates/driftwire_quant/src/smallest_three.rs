//! Smallest-three quaternion compression.
//!
//! A unit quaternion has four components, but the largest-magnitude one can
//! be rebuilt from the other three via the unit-length constraint. We encode
//! a 2-bit index of the dropped component plus the remaining three as
//! fixed-point values in `[-1/sqrt(2), 1/sqrt(2)]`. Quaternions double-cover
//! rotations, so when the dropped component is negative the other three are
//! negated instead of spending a sign bit.

use serde::{Deserialize, Serialize};

use crate::quaternion::Quaternion;

/// Wire-side representation of a smallest-three compressed quaternion.
///
/// Transient: produced by [`SmallestThree::quantize`], consumed by
/// [`SmallestThree::dequantize`], with no lifecycle of its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantizedQuaternion {
    /// Index (0-3) of the dropped largest-magnitude component.
    pub largest: u32,
    /// First kept component, fixed-point.
    pub a: u32,
    /// Second kept component, fixed-point.
    pub b: u32,
    /// Third kept component, fixed-point.
    pub c: u32,
}

/// One component of a unit quaternion never exceeds 1/sqrt(2) in magnitude
/// once the largest is dropped. The epsilon absorbs float noise from inputs
/// that are only approximately normalized.
const UNPACK: f32 = std::f32::consts::FRAC_1_SQRT_2 + 1e-7;
const PACK: f32 = 1.0 / UNPACK;

/// Smallest-three compressor with `BITS_PER_ELEMENT` bits per kept
/// component. Total wire cost is `2 + 3 * BITS_PER_ELEMENT` bits.
///
/// Fidelity: for unit quaternions and `BITS_PER_ELEMENT >= 11`, the decoded
/// quaternion's absolute dot product with the input is at least `1 - 1e-5`.
pub struct SmallestThree<const BITS_PER_ELEMENT: u32 = 12>;

impl<const BITS_PER_ELEMENT: u32> SmallestThree<BITS_PER_ELEMENT> {
    /// Compresses a unit quaternion.
    ///
    /// The input must be (approximately) unit length; callers with arbitrary
    /// quaternions should [`Quaternion::normalized`] first.
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn quantize(quaternion: &Quaternion) -> QuantizedQuaternion {
        let half_range = (1u32 << (BITS_PER_ELEMENT - 1)) as f32;
        let packer = PACK * half_range;

        let elements = quaternion.to_array();

        let mut largest = 0usize;
        let mut max_value = -1.0f32;
        let mut sign_minus = false;

        for (index, element) in elements.iter().enumerate() {
            let abs = element.abs();
            if abs > max_value {
                sign_minus = *element < 0.0;
                largest = index;
                max_value = abs;
            }
        }

        let [af, bf, cf] = kept_components(&elements, largest);
        let sign = if sign_minus { -1.0 } else { 1.0 };

        QuantizedQuaternion {
            largest: largest as u32,
            a: (sign * af * packer + half_range) as u32,
            b: (sign * bf * packer + half_range) as u32,
            c: (sign * cf * packer + half_range) as u32,
        }
    }

    /// Decompresses a quaternion, rebuilding the dropped component.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn dequantize(data: &QuantizedQuaternion) -> Quaternion {
        let half_range = (1u32 << (BITS_PER_ELEMENT - 1)) as f32;
        let unpacker = UNPACK * (1.0 / half_range);

        let a = data.a as f32 * unpacker - half_range * unpacker;
        let b = data.b as f32 * unpacker - half_range * unpacker;
        let c = data.c as f32 * unpacker - half_range * unpacker;

        // Clamp guards against float noise pushing the radicand negative.
        let d = (1.0 - (a * a + b * b + c * c)).max(0.0).sqrt();

        match data.largest {
            0 => Quaternion::new(d, a, b, c),
            1 => Quaternion::new(a, d, b, c),
            2 => Quaternion::new(a, b, d, c),
            _ => Quaternion::new(a, b, c, d),
        }
    }
}

/// The three components left over after dropping `largest`, in slot order.
fn kept_components(elements: &[f32; 4], largest: usize) -> [f32; 3] {
    match largest {
        0 => [elements[1], elements[2], elements[3]],
        1 => [elements[0], elements[2], elements[3]],
        2 => [elements[0], elements[1], elements[3]],
        _ => [elements[0], elements[1], elements[2]],
    }
}
