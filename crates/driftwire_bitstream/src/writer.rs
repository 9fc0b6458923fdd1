//! Bit-level write cursor.
//!
//! Bits accumulate in a 64-bit scratch register, packed from the high end
//! down. Whenever 32 or more bits are pending, the top word is emitted to
//! the backing storage in big-endian wire order. A cursor is created at the
//! start of a serialization pass and discarded at the end; it borrows or
//! owns its storage but never outlives one pass.
//!
//! Every mutating operation checks capacity first and leaves the cursor
//! untouched on failure.

use crate::buffer::{FixedWordBuffer, GrowableWordBuffer, WordStorage};
use crate::checksum::protocol_crc32;
use crate::error::{Result, SerializeError};

/// Write cursor over word-aligned storage.
///
/// `S` selects the storage policy: [`FixedWordBuffer`] for caller-owned
/// memory with a hard capacity, [`GrowableWordBuffer`] for an owned,
/// on-demand-growing buffer.
#[derive(Debug)]
pub struct BitWriter<S: WordStorage> {
    storage: S,
    scratch: u64,
    scratch_bits: u32,
    bits_written: u32,
    word_index: usize,
    total_bits: u32,
}

/// Write cursor over a caller-owned, fixed-capacity word slice.
pub type FixedBitWriter<'a> = BitWriter<FixedWordBuffer<'a>>;

/// Write cursor over an owned, growable word buffer.
pub type GrowingBitWriter = BitWriter<GrowableWordBuffer>;

impl<'a> FixedBitWriter<'a> {
    /// Creates a fixed-capacity writer over a caller-owned word slice.
    ///
    /// Capacity is the full slice, `words.len() * 32` bits.
    #[must_use]
    pub fn from_words(words: &'a mut [u32]) -> Self {
        let total_bits = bit_capacity_of(words.len());
        Self::with_capacity(FixedWordBuffer::new(words), total_bits)
    }
}

impl GrowingBitWriter {
    /// Creates a writer that grows its buffer on demand.
    #[must_use]
    pub fn growing() -> Self {
        Self::new(GrowableWordBuffer::new())
    }

    /// Flushes and returns the backing words, consuming the writer.
    #[must_use]
    pub fn into_words(mut self) -> Vec<u32> {
        let _ = self.flush();
        self.storage.into_words()
    }
}

impl<S: WordStorage> BitWriter<S> {
    /// Creates a writer with capacity derived from the storage: the full
    /// word count for bounded storage, effectively unlimited otherwise.
    #[must_use]
    pub fn new(storage: S) -> Self {
        let total_bits = storage
            .capacity_words()
            .map_or(u32::MAX, bit_capacity_of);
        Self::with_capacity(storage, total_bits)
    }

    /// Creates a writer with an explicit bit capacity.
    ///
    /// Contract: `total_bits` must not exceed what the storage can hold.
    #[must_use]
    pub fn with_capacity(storage: S, total_bits: u32) -> Self {
        debug_assert!(
            match storage.capacity_words() {
                Some(words) => total_bits <= bit_capacity_of(words),
                None => true,
            },
            "declared capacity exceeds backing storage"
        );
        Self {
            storage,
            scratch: 0,
            scratch_bits: 0,
            bits_written: 0,
            word_index: 0,
            total_bits,
        }
    }

    /// Declared capacity in bits.
    #[inline]
    #[must_use]
    pub const fn capacity_bits(&self) -> u32 {
        self.total_bits
    }

    /// Bits written so far.
    #[inline]
    #[must_use]
    pub const fn position_bits(&self) -> u32 {
        self.bits_written
    }

    /// Bits left before the capacity limit.
    #[inline]
    #[must_use]
    pub const fn remaining_bits(&self) -> u32 {
        self.total_bits - self.bits_written
    }

    /// Whether `num_bits` more bits fit.
    #[inline]
    #[must_use]
    pub const fn can_serialize_bits(&self, num_bits: u32) -> bool {
        // checked_add guards the unbounded (u32::MAX capacity) case
        match self.bits_written.checked_add(num_bits) {
            Some(end) => end <= self.total_bits,
            None => false,
        }
    }

    /// Bytes the written bits occupy, rounding up.
    #[inline]
    #[must_use]
    pub const fn bytes_serialized(&self) -> u32 {
        self.bits_written.div_ceil(8)
    }

    /// Raw view of the backing bytes in wire order.
    ///
    /// Only bytes up to [`BitWriter::flush`]'s return value are meaningful.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.storage.words())
    }

    /// Writes the low `num_bits` bits of `value`.
    ///
    /// Contract: `num_bits` in `[1, 32]` (debug-checked). Fails with
    /// [`SerializeError::CapacityExceeded`] without mutating state when the
    /// bits do not fit.
    pub fn serialize_bits(&mut self, value: u32, num_bits: u32) -> Result<()> {
        debug_assert!(
            num_bits >= 1 && num_bits <= 32,
            "bit count must be in [1, 32]"
        );
        self.check_capacity(num_bits)?;

        // The scratch spills into a word below; make sure it exists before
        // any state changes.
        if self.scratch_bits + num_bits >= 32
            && !self.storage.ensure_words(self.word_index + 1)
        {
            return Err(self.capacity_error(num_bits));
        }

        let masked = u64::from(value) & ((1u64 << num_bits) - 1);
        let offset = 64 - num_bits - self.scratch_bits;

        self.scratch |= masked << offset;
        self.scratch_bits += num_bits;
        self.bits_written += num_bits;

        if self.scratch_bits >= 32 {
            #[allow(clippy::cast_possible_truncation)]
            let word = (self.scratch >> 32) as u32;
            self.storage.words_mut()[self.word_index] = word.to_be();
            self.scratch <<= 32;
            self.scratch_bits -= 32;
            self.word_index += 1;
        }

        Ok(())
    }

    /// Writes `num_bits` bits from `bytes`, preserving byte order on the
    /// wire.
    ///
    /// When the cursor is word-aligned, whole words are bulk-copied; the
    /// remainder goes through [`BitWriter::serialize_bits`] a byte at a
    /// time. A trailing partial byte contributes its low bits.
    pub fn serialize_bytes(&mut self, bytes: &[u8], num_bits: u32) -> Result<()> {
        debug_assert!(
            num_bits as usize <= bytes.len() * 8,
            "bit count exceeds provided bytes"
        );
        self.check_capacity(num_bits)?;

        let mut offset = 0usize;
        let mut bits_left = num_bits;

        if self.scratch_bits == 0 {
            let whole_words = (bits_left / 32) as usize;
            if whole_words > 0 {
                if !self.storage.ensure_words(self.word_index + whole_words) {
                    return Err(self.capacity_error(num_bits));
                }
                let start = self.word_index * 4;
                let end = start + whole_words * 4;
                let dst: &mut [u8] = bytemuck::cast_slice_mut(self.storage.words_mut());
                dst[start..end].copy_from_slice(&bytes[..whole_words * 4]);

                self.word_index += whole_words;
                self.bits_written += (whole_words as u32) * 32;
                offset = whole_words * 4;
                bits_left -= (whole_words as u32) * 32;
            }
        }

        while bits_left > 0 {
            let chunk = bits_left.min(8);
            self.serialize_bits(u32::from(bytes[offset]), chunk)?;
            offset += 1;
            bits_left -= chunk;
        }

        Ok(())
    }

    /// Pads with zero bits until the position is byte-aligned.
    pub fn align(&mut self) -> Result<()> {
        let remainder = self.bits_written % 8;
        if remainder != 0 {
            self.serialize_bits(0, 8 - remainder)?;
        }
        Ok(())
    }

    /// Zero-fills until the cursor sits exactly at `num_bytes * 8` bits.
    ///
    /// Fails if that target is already exceeded or lies past the capacity.
    pub fn pad_to_size(&mut self, num_bytes: u32) -> Result<()> {
        let Some(target) = num_bytes.checked_mul(8) else {
            return Err(self.capacity_error(u32::MAX));
        };
        if target > self.total_bits || target < self.bits_written {
            return Err(self.capacity_error(target.saturating_sub(self.bits_written)));
        }

        while self.bits_written < target {
            let chunk = (target - self.bits_written).min(32);
            self.serialize_bits(0, chunk)?;
        }

        Ok(())
    }

    /// Forces pending scratch bits out as a final partial word.
    ///
    /// Returns the total bytes produced so far, rounding up. Idempotent.
    pub fn flush(&mut self) -> u32 {
        if self.scratch_bits > 0 {
            let available = self.storage.ensure_words(self.word_index + 1);
            debug_assert!(available, "flush target word within declared capacity");

            #[allow(clippy::cast_possible_truncation)]
            let word = (self.scratch >> 32) as u32;
            self.storage.words_mut()[self.word_index] = word.to_be();
            self.scratch = 0;
            self.scratch_bits = 0;
            self.word_index += 1;
        }

        self.bytes_serialized()
    }

    /// Reserves the first word for a protocol checksum.
    ///
    /// Must be the first operation on the cursor (debug-checked). The word
    /// is filled in by [`BitWriter::serialize_checksum`].
    pub fn prepend_checksum(&mut self) -> Result<()> {
        debug_assert_eq!(
            self.bits_written, 0,
            "checksum word must be reserved before any field"
        );
        self.check_capacity(32)?;
        if !self.storage.ensure_words(1) {
            return Err(self.capacity_error(32));
        }

        // Zero the slot so an unfinalized buffer never carries garbage.
        self.storage.words_mut()[0] = 0;
        self.word_index = 1;
        self.bits_written = 32;

        Ok(())
    }

    /// Finalizes the buffer: flushes, computes the CRC32 of
    /// `protocol_version` (big-endian) plus every payload byte after the
    /// reserved word, and stores it at offset 0.
    ///
    /// Returns the total bytes produced. Requires a prior
    /// [`BitWriter::prepend_checksum`].
    pub fn serialize_checksum(&mut self, protocol_version: u32) -> Result<u32> {
        let num_bytes = self.flush();
        debug_assert!(num_bytes >= 4, "no checksum word was reserved");
        if num_bytes < 4 {
            return Err(self.capacity_error(32));
        }

        let bytes: &[u8] = bytemuck::cast_slice(self.storage.words());
        let computed = protocol_crc32(protocol_version, &bytes[4..num_bytes as usize]);

        tracing::trace!(num_bytes, checksum = computed, "finalized protocol buffer");
        self.storage.words_mut()[0] = computed.to_be();

        Ok(num_bytes)
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
