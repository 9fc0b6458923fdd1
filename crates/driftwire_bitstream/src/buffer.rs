//! Word-aligned backing storage for bit cursors.
//!
//! The cursor engine only needs a contiguous region of 32-bit words with a
//! known (or growable) capacity; [`WordStorage`] is that seam. The fixed
//! variant borrows caller-owned memory and never allocates; the growable
//! variant owns a `Vec<u32>` and zero-extends on demand.

/// Contiguous word-aligned storage consumed by [`crate::BitWriter`].
///
/// Capacity is always a whole number of 32-bit words. Implementations must
/// keep previously written words intact across [`WordStorage::ensure_words`].
pub trait WordStorage {
    /// Words currently addressable.
    fn words(&self) -> &[u32];

    /// Mutable view of the addressable words.
    fn words_mut(&mut self) -> &mut [u32];

    /// Total words this storage can ever hold, if bounded.
    fn capacity_words(&self) -> Option<usize>;

    /// Makes at least `words` words addressable, zero-filling new ones.
    /// Returns `false` if the storage cannot reach that size.
    fn ensure_words(&mut self, words: usize) -> bool;
}

/// Fixed-capacity storage borrowing a caller-owned word slice.
#[derive(Debug)]
pub struct FixedWordBuffer<'a> {
    words: &'a mut [u32],
}

impl<'a> FixedWordBuffer<'a> {
    /// Wraps a caller-owned word slice. The slice's length is the capacity.
    #[must_use]
    pub fn new(words: &'a mut [u32]) -> Self {
        Self { words }
    }
}

impl WordStorage for FixedWordBuffer<'_> {
    fn words(&self) -> &[u32] {
        self.words
    }

    fn words_mut(&mut self) -> &mut [u32] {
        self.words
    }

    fn capacity_words(&self) -> Option<usize> {
        Some(self.words.len())
    }

    fn ensure_words(&mut self, words: usize) -> bool {
        words <= self.words.len()
    }
}

/// Growable storage over an owned `Vec<u32>`.
///
/// Growth invalidates any previously derived view of the backing memory;
/// the cursor re-derives its word slice on every access.
#[derive(Debug, Default)]
pub struct GrowableWordBuffer {
    words: Vec<u32>,
}

impl GrowableWordBuffer {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage with `words` words pre-allocated.
    #[must_use]
    pub fn with_capacity(words: usize) -> Self {
        Self {
            words: Vec::with_capacity(words),
        }
    }

    /// Consumes the storage, returning the backing words.
    #[must_use]
    pub fn into_words(self) -> Vec<u32> {
        self.words
    }
}

impl WordStorage for GrowableWordBuffer {
    fn words(&self) -> &[u32] {
        &self.words
    }

    fn words_mut(&mut self) -> &mut [u32] {
        &mut self.words
    }

    fn capacity_words(&self) -> Option<usize> {
        None
    }

    fn ensure_words(&mut self, words: usize) -> bool {
        if words > self.words.len() {
            tracing::trace!(from = self.words.len(), to = words, "growing word buffer");
            self.words.resize(words, 0);
        }
        true
    }
}

/// Number of bits needed to represent `value`, i.e. `ceil(log2(value + 1))`.
#[must_use]
pub const fn bits_to_represent(value: u64) -> u32 {
    64 - value.leading_zeros()
}

/// Bits needed to encode any value in `[min, max]` as an offset from `min`.
///
/// Contract: `min <= max`.
#[must_use]
pub const fn bits_in_range(min: u64, max: u64) -> u32 {
    bits_to_represent(max - min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_to_represent() {
        assert_eq!(bits_to_represent(0), 0);
        assert_eq!(bits_to_represent(1), 1);
        assert_eq!(bits_to_represent(2), 2);
        assert_eq!(bits_to_represent(255), 8);
        assert_eq!(bits_to_represent(256), 9);
        assert_eq!(bits_to_represent(1111), 11);
        assert_eq!(bits_to_represent(u64::MAX), 64);
    }

    #[test]
    fn test_bits_in_range_law() {
        // [0, 400] takes 9 bits.
        assert_eq!(bits_in_range(0, 400), 9);
        assert_eq!(bits_in_range(0, 1), 1);
        assert_eq!(bits_in_range(100, 100), 0);
        assert_eq!(bits_in_range(0, u64::from(u32::MAX)), 32);
    }

    #[test]
    fn test_fixed_buffer_refuses_growth() {
        let mut backing = [0u32; 4];
        let mut buffer = FixedWordBuffer::new(&mut backing);

        assert!(buffer.ensure_words(4));
        assert!(!buffer.ensure_words(5));
        assert_eq!(buffer.capacity_words(), Some(4));
    }

    #[test]
    fn test_growable_buffer_zero_fills() {
        let mut buffer = GrowableWordBuffer::new();

        assert!(buffer.ensure_words(3));
        assert_eq!(buffer.words(), &[0, 0, 0]);

        buffer.words_mut()[1] = 0xAABB_CCDD;
        assert!(buffer.ensure_words(5));
        assert_eq!(buffer.words()[1], 0xAABB_CCDD);
        assert_eq!(buffer.capacity_words(), None);
    }
}
