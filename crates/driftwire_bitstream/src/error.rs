//! Error taxonomy for the wire format engine.
//!
//! Programmer-contract violations (bit counts outside `[1, 32]`, inverted
//! integer bounds) are not represented here; those are `debug_assert!`ed at
//! the call sites. Everything a caller can trigger with runtime data is one
//! of these variants.

use thiserror::Error;

/// Errors produced by cursor operations and field codecs.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializeError {
    /// An operation would move the cursor past the declared bit capacity.
    ///
    /// The cursor's observable position is left unchanged.
    #[error("capacity exceeded: operation needs {requested} bits, {remaining} remain")]
    CapacityExceeded {
        /// Bits the operation needed.
        requested: u32,
        /// Bits left before the capacity limit.
        remaining: u32,
    },

    /// A value lies outside its field kind's declared domain.
    ///
    /// Raised before any bits are committed on encode, and when a decoded
    /// value (length, enum discriminant, integer offset) cannot be mapped
    /// back into the domain.
    #[error("value outside the field's declared domain")]
    RangeViolation,

    /// The stored CRC32 does not match the recomputed one.
    #[error("checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// CRC32 read from the buffer's reserved word.
        stored: u32,
        /// CRC32 recomputed over version + payload.
        computed: u32,
    },

    /// Padding bits that must be zero were not, on read.
    #[error("alignment padding bits were not zero")]
    AlignmentPaddingNonZero,
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SerializeError>;
