//! Bit-level read cursor.
//!
//! Mirrors [`crate::BitWriter`] exactly: the read call sequence must match
//! the write call sequence field-by-field, or the decoded values are
//! meaningless. Words are pulled from the buffer in big-endian wire order
//! into the high end of a 64-bit scratch register.

use crate::checksum::protocol_crc32;
use crate::error::{Result, SerializeError};

/// Read cursor over a borrowed word slice.
///
/// The capacity is the bit count the writer produced, which may be less
/// than the backing slice provides.
#[derive(Debug)]
pub struct BitReader<'a> {
    words: &'a [u32],
    scratch: u64,
    scratch_bits: u32,
    bits_read: u32,
    word_index: usize,
    total_bits: u32,
}

impl<'a> BitReader<'a> {
    /// Creates a reader over `words`, limited to `num_bits` bits.
    ///
    /// Contract: `num_bits` must fit in the slice (debug-checked).
    #[must_use]
    pub fn new(words: &'a [u32], num_bits: u32) -> Self {
        debug_assert!(
            num_bits as u64 <= words.len() as u64 * 32,
            "declared bit count exceeds backing words"
        );
        Self {
            words,
            scratch: 0,
            scratch_bits: 0,
            bits_read: 0,
            word_index: 0,
            total_bits: num_bits,
        }
    }

    /// Creates a reader over the full word slice.
    #[must_use]
    pub fn from_words(words: &'a [u32]) -> Self {
        let num_bits = bit_capacity_of(words.len());
        Self::new(words, num_bits)
    }

    /// Declared capacity in bits.
    #[inline]
    #[must_use]
    pub const fn capacity_bits(&self) -> u32 {
        self.total_bits
    }

    /// Bits consumed so far.
    #[inline]
    #[must_use]
    pub const fn position_bits(&self) -> u32 {
        self.bits_read
    }

    /// Bits left to read.
    #[inline]
    #[must_use]
    pub const fn remaining_bits(&self) -> u32 {
        self.total_bits - self.bits_read
    }

    /// Whether `num_bits` more bits can be read.
    #[inline]
    #[must_use]
    pub const fn can_serialize_bits(&self, num_bits: u32) -> bool {
        match self.bits_read.checked_add(num_bits) {
            Some(end) => end <= self.total_bits,
            None => false,
        }
    }

    /// Reads `num_bits` bits, returning them in the low end of the result.
    ///
    /// Contract: `num_bits` in `[1, 32]` (debug-checked). Fails with
    /// [`SerializeError::CapacityExceeded`] without mutating state when the
    /// buffer is exhausted.
    pub fn serialize_bits(&mut self, num_bits: u32) -> Result<u32> {
        debug_assert!(
            num_bits >= 1 && num_bits <= 32,
            "bit count must be in [1, 32]"
        );
        self.check_capacity(num_bits)?;

        if self.scratch_bits < num_bits {
            // Capacity check guarantees this word exists.
            let word = u32::from_be(self.words[self.word_index]);
            self.scratch |= u64::from(word) << (32 - self.scratch_bits);
            self.scratch_bits += 32;
            self.word_index += 1;
        }

        #[allow(clippy::cast_possible_truncation)]
        let value = (self.scratch >> (64 - num_bits)) as u32;

        self.scratch <<= num_bits;
        self.scratch_bits -= num_bits;
        self.bits_read += num_bits;

        Ok(value)
    }

    /// Reads `num_bits` bits into `out`, preserving wire byte order.
    ///
    /// Symmetric with [`crate::BitWriter::serialize_bytes`]: bulk word copy
    /// when the cursor is word-aligned, byte loop otherwise.
    pub fn serialize_bytes(&mut self, out: &mut [u8], num_bits: u32) -> Result<()> {
        debug_assert!(
            num_bits as usize <= out.len() * 8,
            "bit count exceeds output buffer"
        );
        self.check_capacity(num_bits)?;

        let mut offset = 0usize;
        let mut bits_left = num_bits;

        if self.scratch_bits == 0 {
            let whole_words = (bits_left / 32) as usize;
            if whole_words > 0 {
                let src: &[u8] = bytemuck::cast_slice(self.words);
                let start = self.word_index * 4;
                let end = start + whole_words * 4;
                out[..whole_words * 4].copy_from_slice(&src[start..end]);

                self.word_index += whole_words;
                self.bits_read += (whole_words as u32) * 32;
                offset = whole_words * 4;
                bits_left -= (whole_words as u32) * 32;
            }
        }

        while bits_left > 0 {
            let chunk = bits_left.min(8);
            #[allow(clippy::cast_possible_truncation)]
            let value = self.serialize_bits(chunk)? as u8;
            out[offset] = value;
            offset += 1;
            bits_left -= chunk;
        }

        Ok(())
    }

    /// Consumes up to 7 padding bits so the position is byte-aligned.
    ///
    /// Fails with [`SerializeError::AlignmentPaddingNonZero`] if any skipped
    /// bit is set.
    pub fn align(&mut self) -> Result<()> {
        let remainder = self.bits_read % 8;
        if remainder != 0 {
            let padding = self.serialize_bits(8 - remainder)?;
            if padding != 0 {
                return Err(SerializeError::AlignmentPaddingNonZero);
            }
        }
        Ok(())
    }

    /// Consumes zero padding until the cursor sits at `num_bytes * 8` bits.
    ///
    /// Fails if the target is already passed, lies beyond the capacity, or
    /// any padding bit is set.
    pub fn pad_to_size(&mut self, num_bytes: u32) -> Result<()> {
        let Some(target) = num_bytes.checked_mul(8) else {
            return Err(self.capacity_error(u32::MAX));
        };
        if target > self.total_bits || target < self.bits_read {
            return Err(self.capacity_error(target.saturating_sub(self.bits_read)));
        }

        while self.bits_read < target {
            let chunk = (target - self.bits_read).min(32);
            if self.serialize_bits(chunk)? != 0 {
                return Err(SerializeError::AlignmentPaddingNonZero);
            }
        }

        Ok(())
    }

    /// Validates the protocol checksum stored in the first word.
    ///
    /// Recomputes the CRC32 of `protocol_version` (big-endian) plus every
    /// payload byte after the reserved word and compares it against the
    /// stored value, then steps over the reserved word. Must be the first
    /// operation on the cursor (debug-checked).
    pub fn serialize_checksum(&mut self, protocol_version: u32) -> Result<()> {
        debug_assert_eq!(
            self.bits_read, 0,
            "checksum must be validated before any field"
        );
        self.check_capacity(32)?;

        let num_bytes = ((self.total_bits - 1) / 8 + 1) as usize;
        let bytes: &[u8] = bytemuck::cast_slice(self.words);

        let stored = u32::from_be(self.words[0]);
        let computed = protocol_crc32(protocol_version, &bytes[4..num_bytes]);

        if stored != computed {
            tracing::debug!(stored, computed, "protocol checksum mismatch");
            return Err(SerializeError::ChecksumMismatch { stored, computed });
        }

        self.word_index = 1;
        self.bits_read = 32;

        Ok(())
    }

    fn check_capacity(&self, num_bits: u32) -> Result<()> {
        if self.can_serialize_bits(num_bits) {
            Ok(())
        } else {
            Err(self.capacity_error(num_bits))
        }
    }

    const fn capacity_error(&self, requested: u32) -> SerializeError {
        SerializeError::CapacityExceeded {
            requested,
            remaining: self.remaining_bits(),
        }
    }
}

const fn bit_capacity_of(words: usize) -> u32 {
    let bits = words * 32;
    if bits > u32::MAX as usize {
        u32::MAX
    } else {
        #[allow(clippy::cast_possible_truncation)]
        {
            bits as u32
        }
    }
}
