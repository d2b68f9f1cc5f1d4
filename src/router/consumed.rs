//! Consumed-slot bitmap for one resolution attempt.

use smallvec::SmallVec;

/// Number of 64-bit words kept inline before the bitmap spills to the heap.
pub const INLINE_SLOT_WORDS: usize = 2;

/// Argument count that resolves without heap allocation for the bitmap.
pub const INLINE_SLOTS: usize = INLINE_SLOT_WORDS * 64;

/// Tracks which argument slots a route has already consumed.
///
/// Up to [`INLINE_SLOTS`] arguments are tracked in an on-stack bitmap; longer
/// argument vectors spill to a heap-allocated one. Callers only see
/// [`mark`](Self::mark), [`is_marked`](Self::is_marked) and [`count`](Self::count).
#[derive(Debug, Clone)]
pub struct ConsumedSet {
    words: SmallVec<[u64; INLINE_SLOT_WORDS]>,
    len: usize,
    marked: usize,
}

impl ConsumedSet {
    /// An empty set covering `len` slots.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self {
            words: SmallVec::from_elem(0, len.div_ceil(64)),
            len,
            marked: 0,
        }
    }

    /// Mark `slot` consumed. Returns `false` if it was already marked or out of range.
    pub fn mark(&mut self, slot: usize) -> bool {
        if slot >= self.len {
            return false;
        }
        let (word, bit) = (slot / 64, 1u64 << (slot % 64));
        if self.words[word] & bit != 0 {
            return false;
        }
        self.words[word] |= bit;
        self.marked += 1;
        true
    }

    #[inline]
    #[must_use]
    pub fn is_marked(&self, slot: usize) -> bool {
        slot < self.len && self.words[slot / 64] & (1u64 << (slot % 64)) != 0
    }

    /// Number of marked slots.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.marked
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True once every slot has been consumed.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.marked == self.len
    }

    /// First unmarked slot at or after `from`.
    #[must_use]
    pub fn next_unmarked(&self, from: usize) -> Option<usize> {
        (from..self.len).find(|&slot| !self.is_marked(slot))
    }

    /// Whether the bitmap lives on the heap.
    #[must_use]
    pub fn spilled(&self) -> bool {
        self.words.spilled()
    }
}
