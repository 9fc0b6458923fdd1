//! # DRIFTWIRE Quantization
//!
//! Lossy numeric compression primitives for the DRIFTWIRE wire format:
//!
//! - [`BoundedRange`] - fixed-point float compression over a `[min, max]`
//!   range with a caller-chosen precision
//! - [`half`] - IEEE 754 binary16 pack/unpack
//! - [`SmallestThree`] - unit-quaternion compression that drops the
//!   largest-magnitude component and rebuilds it from the unit constraint
//!
//! Everything in this crate is a pure transform on in-memory values. The
//! bit-level cursor engine lives in `driftwire_bitstream` and calls into
//! these primitives through its codec layer.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod bounded_range;
pub mod half;
pub mod quaternion;
pub mod smallest_three;

pub use bounded_range::BoundedRange;
pub use quaternion::Quaternion;
pub use smallest_three::{QuantizedQuaternion, SmallestThree};
